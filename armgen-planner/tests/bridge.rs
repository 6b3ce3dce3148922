use armgen_core::ipc::{EngineRequest, EngineResponse, receive_packet, send_packet};
use armgen_core::planner::Planner;
use armgen_core::transition::StepStatus;
use armgen_planner::remote::EngineBridge;
use interprocess::local_socket::{
    GenericNamespaced, Stream, ToNsName, traits::Stream as StreamTrait,
};
use std::io::BufReader;

// A scripted engine good enough to exercise the bridge protocol.
fn run_fake_engine(socket_name: &'static str, step_status: u8) {
    let socket_name = socket_name.to_ns_name::<GenericNamespaced>().unwrap();
    let conn = Stream::connect(socket_name).unwrap();
    let mut conn = BufReader::new(conn);
    loop {
        match receive_packet::<EngineRequest>(&mut conn).unwrap() {
            EngineRequest::Reset { seed } => {
                send_packet(
                    &mut conn,
                    EngineResponse::ResetResult {
                        start_joints: vec![seed as f32; 5],
                        goal_joints: vec![0.5; 5],
                    },
                )
                .unwrap();
            }
            EngineRequest::Step { action } => {
                send_packet(
                    &mut conn,
                    EngineResponse::StepResult {
                        next_joints: action,
                        reward: 1.0,
                        terminated: true,
                        status: step_status,
                    },
                )
                .unwrap();
            }
            EngineRequest::Halt => {
                send_packet(&mut conn, EngineResponse::Halting).unwrap();
                break;
            }
        }
    }
}

#[test]
fn bridge_round_trips_reset_step_halt() {
    const SOCKET_NAME: &str = "armgen-bridge-test";
    let bridge = EngineBridge::bind(SOCKET_NAME, None, 5).unwrap();
    let engine = std::thread::spawn(|| run_fake_engine(SOCKET_NAME, 1));

    let mut planner = bridge.accept().unwrap();
    assert_eq!(planner.num_joints(), 5);

    let reset = planner.reset(3).unwrap();
    assert_eq!(reset.start_joints, vec![3.0; 5]);
    assert_eq!(reset.goal_joints, vec![0.5; 5]);

    let step = planner.step(&[0.0, 1.0, 0.0, 0.0, 0.0]).unwrap();
    assert_eq!(step.next_joints, vec![0.0, 1.0, 0.0, 0.0, 0.0]);
    assert_eq!(step.status, StepStatus::ReachedGoal);
    assert!(step.terminated);

    // dropping the planner runs the halt handshake
    drop(planner);
    engine.join().unwrap();
}

#[test]
fn unknown_status_codes_are_rejected() {
    const SOCKET_NAME: &str = "armgen-bridge-test-bad-status";
    let bridge = EngineBridge::bind(SOCKET_NAME, None, 5).unwrap();
    let engine = std::thread::spawn(|| run_fake_engine(SOCKET_NAME, 9));

    let mut planner = bridge.accept().unwrap();
    planner.reset(1).unwrap();
    assert!(planner.step(&[0.0, 1.0, 0.0, 0.0, 0.0]).is_err());

    drop(planner);
    engine.join().unwrap();
}
