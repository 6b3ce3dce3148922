use anyhow::{Context, Result, anyhow, bail};
use armgen_core::ipc::{EngineRequest, EngineResponse, receive_packet, send_packet};
use armgen_core::planner::{Planner, ResetOutcome, StepOutcome};
use armgen_core::transition::StepStatus;
use interprocess::local_socket::{
    GenericNamespaced, Listener, ListenerOptions, Stream, ToNsName, traits::ListenerExt,
};
use std::io::BufReader;
use std::process::{Child, Command};
use std::sync::Mutex;

/// Listener side of the engine protocol. One bridge serves a whole collector
/// pool: each worker takes one connection out of it.
pub struct EngineBridge {
    state: Mutex<BridgeState>,
    num_joints: usize,
}

struct BridgeState {
    listener: Listener,
    socket_name: String,
    engine_cmd: Option<Vec<String>>,
}

impl EngineBridge {
    pub fn bind(
        socket_name: &str,
        engine_cmd: Option<Vec<String>>,
        num_joints: usize,
    ) -> Result<Self> {
        let ns_name = socket_name.to_ns_name::<GenericNamespaced>()?;
        let listener = ListenerOptions::new().name(ns_name).create_sync()?;
        Ok(Self {
            state: Mutex::new(BridgeState {
                listener,
                socket_name: socket_name.to_string(),
                engine_cmd,
            }),
            num_joints,
        })
    }

    /// Hands out one engine connection, launching the engine process first
    /// when a launch command is configured. Serialized so every spawned
    /// engine pairs up with its own connection.
    pub fn accept(&self) -> Result<RemotePlanner> {
        let state = self.state.lock().unwrap();
        let child = match &state.engine_cmd {
            Some(cmd) => {
                let (program, args) = cmd.split_first().context("empty engine command")?;
                let child = Command::new(program)
                    .args(args)
                    .args(["--socket-name", state.socket_name.as_str()])
                    .spawn()
                    .with_context(|| format!("failed to launch engine {program}"))?;
                Some(child)
            }
            None => None,
        };
        let conn = state
            .listener
            .incoming()
            .next()
            .context("engine listener closed")??;
        Ok(RemotePlanner {
            conn: BufReader::new(conn),
            child,
            num_joints: self.num_joints,
        })
    }
}

/// A planner living in an external engine process, reached over a local
/// socket with length-prefixed bincode packets.
pub struct RemotePlanner {
    conn: BufReader<Stream>,
    child: Option<Child>,
    num_joints: usize,
}

impl Planner for RemotePlanner {
    fn num_joints(&self) -> usize {
        self.num_joints
    }

    fn reset(&mut self, seed: u64) -> Result<ResetOutcome> {
        send_packet(&mut self.conn, EngineRequest::Reset { seed })?;
        match receive_packet::<EngineResponse>(&mut self.conn)? {
            EngineResponse::ResetResult {
                start_joints,
                goal_joints,
            } => Ok(ResetOutcome {
                start_joints,
                goal_joints,
            }),
            other => bail!("unexpected engine response to reset: {other:?}"),
        }
    }

    fn step(&mut self, action: &[f32]) -> Result<StepOutcome> {
        send_packet(
            &mut self.conn,
            EngineRequest::Step {
                action: action.to_vec(),
            },
        )?;
        match receive_packet::<EngineResponse>(&mut self.conn)? {
            EngineResponse::StepResult {
                next_joints,
                reward,
                terminated,
                status,
            } => {
                let status = StepStatus::try_from_code(status)
                    .ok_or_else(|| anyhow!("engine sent unknown status code {status}"))?;
                Ok(StepOutcome {
                    next_joints,
                    reward,
                    terminated,
                    status,
                })
            }
            other => bail!("unexpected engine response to step: {other:?}"),
        }
    }
}

impl Drop for RemotePlanner {
    fn drop(&mut self) {
        // best effort halt handshake, the engine may already be gone
        if send_packet(&mut self.conn, EngineRequest::Halt).is_ok() {
            let _ = receive_packet::<EngineResponse>(&mut self.conn);
        }
        if let Some(child) = &mut self.child {
            let _ = child.wait();
        }
    }
}
