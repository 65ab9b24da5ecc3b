mod common;

use proptest::prelude::*;

use wre_core::bytecode::BinOp;
use wre_core::vm::CallPhase;
use wre_core::{Block, Callee, Label, Op, Program, Reg, StackGrowth, Transfer, WreConfig, WreError};

use common::{idle_program, machine};

/// Chain of `depth` routines starting at L2; each adds one to its argument
/// and passes it down, the deepest returns it, the others hand R[0] back up.
fn chain(depth: u32) -> Program {
    let mut blocks = vec![
        Block::new(
            vec![],
            Transfer::Call { callee: Callee::Routine(Label(2)), arg: Reg(1), resume: Label(1) },
        ),
        Block::new(vec![], Transfer::Halt),
    ];
    for level in 0..depth {
        let entry = Label(2 + 2 * level);
        let after = Label(entry.0 + 1);
        let mut ops = vec![
            Op::LoadFrame { dst: Reg(5), offset: 0 },
            Op::LoadImm { dst: Reg(6), value: 1 },
        ];
        if level + 1 < depth {
            ops.push(Op::Binary { op: BinOp::Add, dst: Reg(5), lhs: Reg(5), rhs: Reg(6) });
            blocks.push(Block::new(
                ops,
                Transfer::Call { callee: Callee::Routine(Label(entry.0 + 2)), arg: Reg(5), resume: after },
            ));
        } else {
            blocks.push(Block::new(ops, Transfer::Return { value: Some(Reg(5)) }));
        }
        blocks.push(Block::new(vec![], Transfer::Return { value: Some(Reg(0)) }));
    }
    Program::new(Label(0), blocks).expect("valid chain")
}

proptest! {
    #[test]
    fn nested_calls_are_stack_neutral(
        depth in 1u32..48,
        argument in any::<i32>(),
        preload in 0usize..8,
        downward in any::<bool>(),
    ) {
        let growth = if downward { StackGrowth::Downward } else { StackGrowth::Upward };
        let mut vm = machine(WreConfig::new().with_stack_growth(growth), chain(depth), "");
        for i in 0..preload {
            vm.store_mut().push(i as i32).unwrap();
        }
        let (sp, fp) = (vm.store().sp(), vm.store().fp());

        let record = vm.call(Callee::Routine(Label(2)), argument).expect("call failed");

        prop_assert_eq!(record.return_value, argument.wrapping_add(depth as i32 - 1));
        prop_assert_eq!(record.phase(), CallPhase::Dispatched);
        prop_assert_eq!(vm.store().register(0).unwrap(), record.return_value);
        prop_assert_eq!((vm.store().sp(), vm.store().fp()), (sp, fp));
        prop_assert_eq!(vm.store().stack_depth(), preload);
    }
}

#[test]
fn program_driven_chain_halts_with_clean_stack() {
    for growth in [StackGrowth::Upward, StackGrowth::Downward] {
        let config = WreConfig::new().with_stack_growth(growth);
        let mut vm = machine(config, chain(10), "");
        let initial = vm.store().sp();
        vm.run().expect("execution failed");
        assert!(vm.is_halted());
        assert_eq!(vm.store().sp(), initial);
        assert_eq!(vm.store().fp(), initial);
        assert_eq!(vm.store().register(0).unwrap(), 9);
    }
}

#[test]
fn deep_recursion_overflows_into_bounds_error() {
    // 100 memory cells hold 33 frames at most
    let config = WreConfig::compact();
    let mut vm = machine(config, chain(40), "");
    assert!(matches!(vm.run(), Err(WreError::Bounds { .. })));
}

#[test]
fn return_without_a_frame_is_fatal() {
    let program = Program::new(Label(0), vec![Block::new(vec![], Transfer::Return { value: None })]).unwrap();
    let mut vm = machine(WreConfig::compact(), program, "");
    assert!(matches!(vm.run(), Err(WreError::Bounds { .. })));
}

#[test]
fn routine_without_result_hands_back_zero() {
    let program = Program::new(
        Label(0),
        vec![
            Block::new(vec![], Transfer::Halt),
            Block::new(vec![], Transfer::Return { value: None }),
        ],
    )
    .unwrap();
    let mut vm = machine(WreConfig::compact(), program, "");
    vm.store_mut().set_register(0, 1234).unwrap();
    let record = vm.call(Callee::Routine(Label(1)), 9).unwrap();
    assert_eq!(record.argument, 9);
    assert_eq!(record.return_value, 0);
    assert_eq!(vm.store().register(0).unwrap(), 0);
}

#[test]
fn routine_leaving_words_behind_is_rejected() {
    let program = Program::new(
        Label(0),
        vec![
            Block::new(vec![], Transfer::Halt),
            Block::new(vec![Op::Push { src: Reg(0) }], Transfer::Return { value: None }),
        ],
    )
    .unwrap();
    let mut vm = machine(WreConfig::compact(), program, "");
    assert!(matches!(
        vm.call(Callee::Routine(Label(1)), 0),
        Err(WreError::UnbalancedFrame { .. })
    ));
}

#[test]
fn halting_inside_a_host_call_is_reported() {
    let mut vm = machine(WreConfig::compact(), idle_program(), "");
    assert!(matches!(vm.call(Callee::Routine(Label(0)), 0), Err(WreError::Halted)));
}

#[test]
fn host_sentinel_in_a_program_run_is_an_invalid_label() {
    let program = Program::new(
        Label(0),
        vec![
            Block::new(
                vec![],
                Transfer::Call { callee: Callee::Routine(Label(2)), arg: Reg(0), resume: Label(1) },
            ),
            Block::new(vec![], Transfer::Halt),
            Block::new(
                vec![
                    Op::LoadImm { dst: Reg(3), value: -1 },
                    Op::StoreFrame { offset: -2, src: Reg(3) },
                ],
                Transfer::Return { value: None },
            ),
        ],
    )
    .unwrap();
    let mut vm = machine(WreConfig::compact(), program, "");
    assert!(matches!(vm.run(), Err(WreError::InvalidLabel(-1))));
    assert!(!vm.is_halted());
}
