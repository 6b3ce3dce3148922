use crate::transition::Transition;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const ZSTD_LEVEL: i32 = 3;

/// Batch files are named by the cumulative sample count at the time the
/// batch was collected, so a run can be resumed by inspecting the directory.
pub fn batch_file_name(collected: usize) -> String {
    format!("transitions_{collected}.bin.zst")
}

pub fn write_batch(path: impl AsRef<Path>, batch: &[Transition]) -> Result<()> {
    let path = path.as_ref();
    let payload = bincode::encode_to_vec(batch, bincode::config::standard())?;
    let compressed = zstd::encode_all(payload.as_slice(), ZSTD_LEVEL)?;
    fs::write(path, compressed).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

pub fn read_batch(path: impl AsRef<Path>) -> Result<Vec<Transition>> {
    let path = path.as_ref();
    let compressed =
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let payload = zstd::decode_all(compressed.as_slice())?;
    let (batch, _) = bincode::decode_from_slice(&payload, bincode::config::standard())?;
    Ok(batch)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::transition::StepStatus;

    #[test]
    fn batch_survives_a_write_and_read() {
        let batch = vec![Transition {
            start_joints: vec![0.0, 0.3, -0.2, 0.1, 0.4],
            goal_joints: vec![0.0, -0.5, 0.2, 0.3, -0.1],
            action: vec![0.0, 0.6, -0.8, 0.0, 0.0],
            next_joints: vec![0.0, 0.33, -0.24, 0.1, 0.4],
            reward: -0.01,
            terminated: false,
            status: StepStatus::Timeout,
        }];
        let dir = std::env::temp_dir().join("armgen-dump-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(batch_file_name(0));
        write_batch(&path, &batch).unwrap();
        assert_eq!(read_batch(&path).unwrap(), batch);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn file_names_carry_the_cumulative_count() {
        assert_eq!(batch_file_name(0), "transitions_0.bin.zst");
        assert_eq!(batch_file_name(5000), "transitions_5000.bin.zst");
    }
}
