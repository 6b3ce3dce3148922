use crate::transition::StepStatus;
use anyhow::Result;

/// Start and goal configuration pair a reset produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ResetOutcome {
    pub start_joints: Vec<f32>,
    pub goal_joints: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub next_joints: Vec<f32>,
    pub reward: f32,
    pub terminated: bool,
    pub status: StepStatus,
}

/// The seam to the motion-planning/simulation engine. Implementations own
/// whatever state the engine needs; the collector only ever resets and steps.
pub trait Planner {
    fn num_joints(&self) -> usize;
    fn reset(&mut self, seed: u64) -> Result<ResetOutcome>;
    fn step(&mut self, action: &[f32]) -> Result<StepOutcome>;
}

pub trait PlannerBuilder: Sync + Send + 'static {
    type Planner: Planner;

    fn build_planner(&self) -> Result<Self::Planner>;
}

impl<P: Planner, F: Sync + Send + 'static> PlannerBuilder for F
where
    F: Fn() -> Result<P>,
{
    type Planner = P;

    fn build_planner(&self) -> Result<Self::Planner> {
        (self)()
    }
}
