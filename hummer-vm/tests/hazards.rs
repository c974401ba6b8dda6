use hummer_vm::prelude::*;

fn fr(n: u8) -> FpRef {
    FpRegister::new(n).into()
}

fn ir(n: u8) -> IntRegister {
    IntRegister::new(n)
}

#[test]
fn fp_hazard_stalls_dependent_reissue() {
    let mut vm = Interpreter::default();
    let madd = Opcode::FXCPMADD(fr(0), fr(1), fr(2), fr(0));

    vm.execute_one(&madd).unwrap();
    assert_eq!(vm.cycle(), 0);

    // The second issue reads f0, still hazarded for the full FP latency.
    vm.execute_one(&madd).unwrap();
    assert_eq!(vm.cycle(), 5);
    assert_eq!(vm.counters().count(ExecUnit::Fp), 2);
}

#[test]
fn load_unit_throughput_spaces_issues() {
    let mut vm = Interpreter::default();
    let loads = [
        Opcode::LFPD(fr(0), ir(0), 0),
        Opcode::LFPD(fr(1), ir(0), 0),
        Opcode::LFPD(fr(2), ir(0), 0),
    ];

    let mut issue_cycles = Vec::new();
    for op in &loads {
        vm.execute_one(op).unwrap();
        issue_cycles.push(vm.cycle());
    }

    assert_eq!(issue_cycles, [0, 2, 4]);
    assert_eq!(vm.counters().count(ExecUnit::Ls), 3);
}

#[test]
fn load_to_use_stall_is_dominated_by_inuse_window() {
    let mut vm = Interpreter::default();

    vm.execute_one(&Opcode::LFPD("a".into(), ir(0), 0)).unwrap();
    assert_eq!(vm.cycle(), 0);

    // Load latency is 4 but the loaded register stays in use as a source
    // for 5 cycles; the max dominates.
    vm.execute_one(&Opcode::FXCPMADD("r".into(), "w".into(), "a".into(), "r".into()))
        .unwrap();
    assert_eq!(vm.cycle(), 5);
}

#[test]
fn independent_fp_ops_issue_back_to_back() {
    let mut vm = Interpreter::default();

    vm.execute_one(&Opcode::FXPMUL(fr(0), fr(1), fr(2))).unwrap();
    vm.execute_one(&Opcode::FXPMUL(fr(3), fr(4), fr(5))).unwrap();

    // FP inverse throughput is 1: one stall cycle on the unit, no hazards.
    assert_eq!(vm.cycle(), 1);
}

#[test]
fn store_after_arith_waits_on_source_hazard() {
    let mut vm = Interpreter::default();

    vm.execute_one(&Opcode::FXPMUL(fr(0), fr(1), fr(2))).unwrap();
    // The store reads f0, hazarded for 5 cycles by the multiply.
    vm.execute_one(&Opcode::STFPDUX(fr(0), ir(0), ir(1))).unwrap();
    assert_eq!(vm.cycle(), 5);
}

#[test]
fn flush_pipeline_clears_countdowns_but_not_state() {
    let mut vm = Interpreter::default();
    vm.execute_one(&Opcode::FPSET2(fr(3), 1.5, 2.5)).unwrap();
    vm.execute_one(&Opcode::LFPD(fr(4), ir(0), 0)).unwrap();
    vm.execute_one(&Opcode::STFPDUX(fr(3), ir(1), ir(2))).unwrap();

    assert!(!vm.hazards().is_empty());
    assert!(!vm.units().is_empty());
    assert!(!vm.inuse_source().is_empty());
    assert!(!vm.inuse_destination().is_empty());
    assert_eq!(vm.writethrough().in_flight(), 1);

    let cycle = vm.cycle();
    vm.flush_pipeline();

    assert!(vm.hazards().is_empty());
    assert!(vm.units().is_empty());
    assert!(vm.inuse_source().is_empty());
    assert!(vm.inuse_destination().is_empty());
    assert!(vm.writethrough().is_empty());

    // Architectural state survives the flush.
    assert_eq!(vm.cycle(), cycle);
    assert_eq!(vm.fp_registers()[3], FpVal::new(1.5, 2.5));
    assert_eq!(&vm.memory()[..2], &[1.5, 2.5]);
}

#[test]
fn trace_records_issues_and_stalls() {
    let mut vm = Interpreter::default();
    vm.set_trace(TraceSink::Buffer(Vec::new()));

    vm.execute_one(&Opcode::LFPD("a".into(), ir(0), 0)).unwrap();
    vm.execute_one(&Opcode::FXCPMADD("r".into(), "w".into(), "a".into(), "r".into()))
        .unwrap();

    let lines = vm.trace().lines();
    assert_eq!(lines[0], "[ 0] lfpd(frt=a, ra=r0, d=0)");
    // Four cycles of register hazard on `a`, then one in-use-source cycle.
    assert_eq!(lines[1], "[ 0] -- register hazards: (a:f0,4)");
    assert_eq!(lines[4], "[ 3] -- register hazards: (a:f0,1)");
    assert_eq!(lines[5], "[ 4] -- source registers in use: (a:f0,1)");
    assert_eq!(
        lines[6],
        "[ 5] fxcpmadd(rt=r, ra=w, rc=a, rb=r)"
    );
}
