use anyhow::Result;
use bincode::{Decode, Encode};
use interprocess::local_socket::Stream;
use std::io::{BufReader, Read, Write};

#[derive(Debug, Clone, Encode, Decode)]
pub enum EngineRequest {
    // Obtain a fresh start/goal configuration pair
    Reset { seed: u64 },
    // Execute one motion step
    Step { action: Vec<f32> },
    // Ask the engine to exit
    Halt,
}

#[derive(Debug, Clone, Encode, Decode)]
pub enum EngineResponse {
    ResetResult {
        start_joints: Vec<f32>,
        goal_joints: Vec<f32>,
    },
    StepResult {
        next_joints: Vec<f32>,
        reward: f32,
        terminated: bool,
        // raw outcome code, see StepStatus::try_from_code
        status: u8,
    },
    Halting,
}

// Custom low level protocol to send data
pub fn send_packet<P: Encode>(conn: &mut BufReader<Stream>, packet: P) -> Result<()> {
    let payload = bincode::encode_to_vec(packet, bincode::config::standard())?;
    let payload_len = (payload.len() as u32).to_be_bytes();
    conn.get_mut().write_all(&payload_len)?;
    conn.get_mut().write_all(&payload)?;
    conn.get_mut().flush()?;
    Ok(())
}

// Custom low level protocol to receive data
pub fn receive_packet<P: Decode<()>>(conn: &mut BufReader<Stream>) -> Result<P> {
    let mut content_len = [0u8; 4];
    conn.read_exact(&mut content_len)?;
    let len = u32::from_be_bytes(content_len);
    let mut buffer = vec![0u8; len as usize];
    conn.read_exact(&mut buffer)?;
    let (packet, _) = bincode::decode_from_slice(&buffer, bincode::config::standard())?;
    Ok(packet)
}
