use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

use hummer_vm::prelude::*;

fn fr(n: u8) -> FpRegister {
    FpRegister::new(n)
}

fn ir(n: u8) -> IntRegister {
    IntRegister::new(n)
}

/// A core with the labels the scenario streams read pre-bound.
fn bound_vm() -> Interpreter {
    let mut vm = Interpreter::default();
    vm.name_registers([("r", fr(0)), ("w", fr(1)), ("a", fr(2))])
        .unwrap();
    vm
}

#[test]
fn reader_before_writer_keeps_input_order() {
    let mut vm = bound_vm();
    let madd = Opcode::FXCPMADD("r".into(), "w".into(), "a".into(), "r".into());
    let load = Opcode::LFPD("a".into(), ir(0), 16);

    // The load writes `a` after the madd reads it; the madd is the only
    // candidate on the first step.
    let mut bag = vec![madd.clone(), load.clone()];
    let issued = vm.schedule(&mut bag).unwrap();

    assert!(bag.is_empty());
    assert_eq!(issued, vec![madd, load]);
}

#[test]
fn writer_before_reader_may_not_swap() {
    let mut vm = bound_vm();
    let load = Opcode::LFPD("a".into(), ir(0), 16);
    let madd = Opcode::FXCPMADD("r".into(), "w".into(), "a".into(), "r".into());

    let mut bag = vec![load.clone(), madd.clone()];
    let issued = vm.schedule(&mut bag).unwrap();

    assert_eq!(issued, vec![load, madd]);
    // Load at cycle 0; the madd rides out the 5-cycle in-use window on `a`.
    assert_eq!(vm.cycle(), 5);
}

#[test]
fn scheduler_hoists_independent_loads_over_stalled_arithmetic() {
    let mut vm = bound_vm();
    vm.name_registers([("b", fr(3))]).unwrap();

    let mut bag = vec![
        Opcode::LFPD("a".into(), ir(0), 0),
        Opcode::FXCPMADD("r".into(), "w".into(), "a".into(), "r".into()),
        Opcode::LFPD("b".into(), ir(0), 16),
    ];
    let issued = vm.schedule(&mut bag).unwrap();

    // The madd stalls on `a` while the second load is free: the scheduler
    // issues both loads first.
    assert_eq!(issued[0].name(), "lfpd");
    assert_eq!(issued[1].name(), "lfpd");
    assert_eq!(issued[2].name(), "fxcpmadd");
}

#[test]
fn rescheduling_the_scheduled_order_costs_the_same() {
    let mut vm = bound_vm();
    let mut bag = vec![
        Opcode::LFPD("a".into(), ir(0), 16),
        Opcode::FXCPMADD("r".into(), "w".into(), "a".into(), "r".into()),
    ];
    let issued = vm.schedule(&mut bag).unwrap();
    let first_run = vm.cycle();

    let mut vm2 = bound_vm();
    let mut bag2 = issued.clone();
    let issued2 = vm2.schedule(&mut bag2).unwrap();

    assert_eq!(issued2, issued);
    assert_eq!(vm2.cycle(), first_run);
}

#[test]
fn executing_the_issue_order_reproduces_the_schedule_cycle_count() {
    let mut vm = bound_vm();
    vm.name_registers([("b", fr(3)), ("s", fr(4))]).unwrap();

    let mut bag = vec![
        Opcode::LFPD("a".into(), ir(0), 0),
        Opcode::LFPD("b".into(), ir(1), 16),
        Opcode::FXCPMADD("r".into(), "w".into(), "a".into(), "r".into()),
        Opcode::FXCPMADD("s".into(), "w".into(), "b".into(), "s".into()),
        Opcode::INTSET(ir(2), 64),
        Opcode::INTSET(ir(3), 16),
        Opcode::STFPDUX("r".into(), ir(2), ir(3)),
    ];
    let issued = vm.schedule(&mut bag).unwrap();

    let mut replay = bound_vm();
    replay.name_registers([("b", fr(3)), ("s", fr(4))]).unwrap();
    replay.execute(&issued).unwrap();

    assert_eq!(replay.cycle(), vm.cycle());
    assert_eq!(replay.memory(), vm.memory());
}

#[test]
fn empty_bag_has_no_safe_instruction() {
    let mut vm = Interpreter::default();
    let mut bag = Vec::new();

    assert!(vm.schedule(&mut bag).unwrap().is_empty());
    assert_eq!(
        vm.schedule_one(&mut bag).unwrap_err(),
        InterpreterError::NoSafeInstruction
    );
}

/// Small operand universe so generated bags actually collide on registers.
#[derive(Debug, Clone)]
struct Bag(Vec<Opcode>);

impl Arbitrary for Bag {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 12;
        let ops = (0..len)
            .map(|_| {
                let t = fr(u8::arbitrary(g) % 4).into();
                let a = fr(u8::arbitrary(g) % 4).into();
                let c = fr(u8::arbitrary(g) % 4).into();
                let b = fr(u8::arbitrary(g) % 4).into();
                let base = ir(u8::arbitrary(g) % 2);
                let d = i64::from(u8::arbitrary(g) % 2) * 16;
                match u8::arbitrary(g) % 6 {
                    0 => Opcode::FXCPMADD(t, a, c, b),
                    1 => Opcode::FXPMUL(t, a, c),
                    2 => Opcode::FPADD(t, a, c),
                    3 => Opcode::FPSET2(t, 1.0, 2.0),
                    4 => Opcode::LFPD(t, base, d),
                    _ => Opcode::STFPDUX(t, base, ir(2)),
                }
            })
            .collect();
        Bag(ops)
    }
}

fn touches(op: &Opcode) -> (Vec<String>, Vec<String>) {
    let reads = op
        .reads()
        .iter()
        .map(ToString::to_string)
        .chain(op.ireads().iter().map(ToString::to_string))
        .collect();
    let writes = op
        .writes()
        .iter()
        .map(ToString::to_string)
        .chain(op.iwrites().iter().map(ToString::to_string))
        .collect();
    (reads, writes)
}

/// True, anti or output dependency between two instructions.
fn depends(earlier: &Opcode, later: &Opcode) -> bool {
    let (er, ew) = touches(earlier);
    let (lr, lw) = touches(later);
    lr.iter().any(|k| ew.contains(k))
        || lw.iter().any(|k| er.contains(k))
        || lw.iter().any(|k| ew.contains(k))
}

#[quickcheck]
fn schedule_is_a_topological_extension(bag: Bag) -> bool {
    let mut vm = Interpreter::default();
    let mut pending = bag.0.clone();
    let Ok(issued) = vm.schedule(&mut pending) else {
        return false;
    };

    if issued.len() != bag.0.len() {
        return false;
    }

    // Every dependent pair of the input order must keep its order in the
    // issue order. Ops can repeat, so match up occurrence indices.
    let position = |op: &Opcode, skip: usize| {
        issued
            .iter()
            .enumerate()
            .filter(|(_, o)| *o == op)
            .map(|(i, _)| i)
            .nth(skip)
    };

    for i in 0..bag.0.len() {
        for j in (i + 1)..bag.0.len() {
            if !depends(&bag.0[i], &bag.0[j]) {
                continue;
            }
            let skip_i = bag.0[..i].iter().filter(|o| **o == bag.0[i]).count();
            let skip_j = bag.0[..j].iter().filter(|o| **o == bag.0[j]).count();
            let (Some(pi), Some(pj)) = (position(&bag.0[i], skip_i), position(&bag.0[j], skip_j))
            else {
                return false;
            };
            if pi >= pj {
                return false;
            }
        }
    }
    true
}
