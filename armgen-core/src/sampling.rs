use crate::planner::Planner;
use crate::rng::RNG;
use crate::transition::Transition;
use anyhow::Result;
use rand::Rng;

/// Draws a random direction on the unit sphere spanned by the free joints.
/// The first coordinate is a reserved degree of freedom and stays zero.
pub fn random_direction<R: Rng>(rng: &mut R, num_joints: usize) -> Vec<f32> {
    assert!(num_joints >= 2, "need at least one free joint");
    let free_joints = num_joints - 1;
    loop {
        let direction: Vec<f32> = (0..free_joints)
            .map(|_| rng.random_range(-1.0..1.0))
            .collect();
        let norm = direction.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm < 1e-6 {
            // degenerate draw, try again
            continue;
        }
        let mut action = Vec::with_capacity(num_joints);
        action.push(0.0);
        action.extend(direction.iter().map(|x| x / norm));
        return action;
    }
}

/// One sample: reset to a fresh start/goal pair, apply a random unit action,
/// record whatever the engine reports. Faults propagate to the caller.
pub fn draw_transition<P: Planner>(planner: &mut P) -> Result<Transition> {
    let seed = RNG.with_borrow_mut(|rng| rng.random::<u64>());
    let reset = planner.reset(seed)?;
    let action = RNG.with_borrow_mut(|rng| random_direction(rng, reset.start_joints.len()));
    let step = planner.step(&action)?;
    Ok(Transition {
        start_joints: reset.start_joints,
        goal_joints: reset.goal_joints,
        action,
        next_joints: step.next_joints,
        reward: step.reward,
        terminated: step.terminated,
        status: step.status,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn direction_is_unit_norm_with_fixed_first_joint() {
        let mut rng = StdRng::seed_from_u64(7);
        for num_joints in 2..10 {
            let action = random_direction(&mut rng, num_joints);
            assert_eq!(action.len(), num_joints);
            assert_eq!(action[0], 0.0);
            let norm = action.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5, "norm was {norm}");
        }
    }

    #[test]
    fn direction_is_deterministic_under_a_seed() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        assert_eq!(random_direction(&mut a, 5), random_direction(&mut b, 5));
    }
}
