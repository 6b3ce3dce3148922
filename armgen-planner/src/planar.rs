use anyhow::{Result, ensure};
use armgen_core::config::PlannerConfig;
use armgen_core::planner::{Planner, ResetOutcome, StepOutcome};
use armgen_core::transition::StepStatus;
use rand::{Rng, SeedableRng, rngs::StdRng};

const COLLISION_REWARD: f32 = -1.0;
const GOAL_REWARD: f32 = 1.0;
const STEP_REWARD: f32 = -0.01;

/// Kinematic stand-in for the real planning engine: joints move freely inside
/// symmetric limits and the goal is a joint-space configuration. Meant for
/// tests and smoke runs, the interesting physics lives in the external engine.
pub struct PlanarArm {
    num_joints: usize,
    max_steps: usize,
    goal_tolerance: f32,
    step_size: f32,
    joint_limit: f32,
    joints: Vec<f32>,
    goal: Vec<f32>,
    steps_taken: usize,
    rng: StdRng,
}

impl PlanarArm {
    pub fn new(
        num_joints: usize,
        max_steps: usize,
        goal_tolerance: f32,
        step_size: f32,
        joint_limit: f32,
    ) -> Self {
        Self {
            num_joints,
            max_steps,
            goal_tolerance,
            step_size,
            joint_limit,
            joints: vec![0.0; num_joints],
            goal: vec![0.0; num_joints],
            steps_taken: 0,
            rng: StdRng::seed_from_u64(0),
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(
            config.num_joints,
            config.max_steps,
            config.goal_tolerance,
            config.step_size,
            config.joint_limit,
        )
    }

    fn sample_joints(&mut self) -> Vec<f32> {
        let limit = self.joint_limit;
        (0..self.num_joints)
            .map(|_| self.rng.random_range(-limit..limit))
            .collect()
    }

    fn goal_distance(&self) -> f32 {
        self.joints
            .iter()
            .zip(&self.goal)
            .map(|(j, g)| (j - g).powi(2))
            .sum::<f32>()
            .sqrt()
    }
}

impl Planner for PlanarArm {
    fn num_joints(&self) -> usize {
        self.num_joints
    }

    fn reset(&mut self, seed: u64) -> Result<ResetOutcome> {
        self.rng = StdRng::seed_from_u64(seed);
        self.joints = self.sample_joints();
        self.goal = self.sample_joints();
        // the first joint never moves, keep the goal reachable
        self.goal[0] = self.joints[0];
        self.steps_taken = 0;
        Ok(ResetOutcome {
            start_joints: self.joints.clone(),
            goal_joints: self.goal.clone(),
        })
    }

    fn step(&mut self, action: &[f32]) -> Result<StepOutcome> {
        ensure!(
            action.len() == self.num_joints,
            "action has {} coordinates, arm has {} joints",
            action.len(),
            self.num_joints
        );
        self.steps_taken += 1;
        for (joint, delta) in self.joints.iter_mut().zip(action) {
            *joint += self.step_size * delta;
        }
        let collided = self.joints.iter().any(|j| j.abs() > self.joint_limit);
        let reached = !collided && self.goal_distance() <= self.goal_tolerance;
        let (status, reward) = if collided {
            (StepStatus::Collision, COLLISION_REWARD)
        } else if reached {
            (StepStatus::ReachedGoal, GOAL_REWARD)
        } else {
            (StepStatus::Timeout, STEP_REWARD)
        };
        let terminated = collided || reached || self.steps_taken >= self.max_steps;
        Ok(StepOutcome {
            next_joints: self.joints.clone(),
            reward,
            terminated,
            status,
        })
    }
}
