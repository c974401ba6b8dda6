use hummer_vm::prelude::*;

fn fr(n: u8) -> FpRef {
    FpRegister::new(n).into()
}

fn ir(n: u8) -> IntRegister {
    IntRegister::new(n)
}

#[test]
fn seventh_store_stalls_until_oldest_token_drains() {
    let mut vm = Interpreter::default();

    // Seven stores with independent operands. The first six pace at the
    // store throughput of 4; the seventh finds all six tokens in flight and
    // waits for the oldest (issued at cycle 0, 40-cycle drain).
    let mut issue_cycles = Vec::new();
    for n in 0..7 {
        let store = Opcode::STFPDUX(fr(n), ir(n), ir(7));
        vm.execute_one(&store).unwrap();
        issue_cycles.push(vm.cycle());
    }

    assert_eq!(issue_cycles, [0, 4, 8, 12, 16, 20, 40]);
}

#[test]
fn token_count_never_exceeds_the_bucket() {
    let mut vm = Interpreter::default();
    let max = vm.params().writethrough_tokens;

    for n in 0..10 {
        let store = Opcode::STFPDUX(fr(n % 8), ir(n % 8), ir(8));
        vm.execute_one(&store).unwrap();
        assert!(vm.writethrough().in_flight() <= max);
    }
}

#[test]
fn loads_do_not_consume_tokens() {
    let mut vm = Interpreter::default();

    vm.execute_one(&Opcode::LFPD(fr(0), ir(0), 0)).unwrap();
    vm.execute_one(&Opcode::STFPDUX(fr(1), ir(1), ir(2))).unwrap();

    assert_eq!(vm.writethrough().in_flight(), 1);
}

#[test]
fn shrunken_bucket_parameters_apply() {
    let params = InterpreterParams {
        writethrough_tokens: 1,
        writethrough_latency: 10,
        ..Default::default()
    };
    let mut vm = Interpreter::new(params);

    vm.execute_one(&Opcode::STFPDUX(fr(0), ir(0), ir(2))).unwrap();
    assert_eq!(vm.cycle(), 0);

    // One token slot: the second store waits out the full drain.
    vm.execute_one(&Opcode::STFPDUX(fr(1), ir(1), ir(2))).unwrap();
    assert_eq!(vm.cycle(), 10);
}
