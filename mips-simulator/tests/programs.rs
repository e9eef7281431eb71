use mips_simulator::config::Config;
use mips_simulator::{Processor, State};
use mips_types::registers::RegisterId;
use std::io::Cursor;

fn run(words: &[u32], input: &str) -> Processor {
    let mut processor =
        Processor::with_input(Config::default(), Cursor::new(input.as_bytes().to_vec()));
    processor.load_instructions(words).unwrap();
    processor.run().unwrap();
    assert_eq!(processor.state(), State::Halted);
    processor
}

fn register(processor: &Processor, number: u8) -> i32 {
    processor
        .registers()
        .into_iter()
        .find(|(id, _)| *id == RegisterId::General(number))
        .map(|(_, value)| value)
        .unwrap()
}

#[test]
fn sum_three_registers() {
    let processor = run(
        &[
            0x20010005, // addi $1, $0, 5
            0x20020007, // addi $2, $0, 7
            0x00221820, // add $3, $1, $2
        ],
        "",
    );

    assert_eq!(register(&processor, 3), 12);
}

#[test]
fn counting_loop() {
    let processor = run(
        &[
            0x20080005, // addi $8, $0, 5
            0x20090000, // addi $9, $0, 0
            0x01284820, // loop: add $9, $9, $8
            0x2108FFFF, // addi $8, $8, -1
            0x1500FFFD, // bne $8, $0, loop
        ],
        "",
    );

    assert_eq!(register(&processor, 9), 15);
    assert_eq!(register(&processor, 8), 0);
    assert_eq!(processor.program_counter(), 0x0040_0014);
}

#[test]
fn call_and_return() {
    let processor = run(
        &[
            0x0C100003, // jal 0x0040000C
            0x204A0000, // addi $10, $2, 0
            0x08100005, // j 0x00400014
            0x2002002A, // addi $2, $0, 42
            0x03E00008, // jr $31
            0x200B0001, // addi $11, $0, 1
        ],
        "",
    );

    assert_eq!(register(&processor, 10), 42);
    assert_eq!(register(&processor, 11), 1);
    assert_eq!(register(&processor, 31), 0x0040_0004);
}

#[test]
fn multiply_and_spill_to_stack() {
    let processor = run(
        &[
            0x2008FFFA, // addi $8, $0, -6
            0x20090007, // addi $9, $0, 7
            0x01090018, // mult $8, $9
            0x00005012, // mflo $10
            0x00005810, // mfhi $11
            0xAFAAFFFC, // sw $10, -4($29)
            0x8FACFFFC, // lw $12, -4($29)
        ],
        "",
    );

    assert_eq!(register(&processor, 10), -42);
    assert_eq!(register(&processor, 11), -1);
    assert_eq!(register(&processor, 12), -42);
    assert_eq!(processor.memory()[&0x7FFF_EFF8], -42);
}

#[test]
fn build_and_print_string() {
    let mut processor = Processor::with_input(Config::default(), Cursor::new(Vec::new()));
    processor
        .load_instructions(&[
            0x3C041001, // lui $4, 0x1001
            0x20080048, // addi $8, $0, 'H'
            0xA0880000, // sb $8, 0($4)
            0x20080069, // addi $8, $0, 'i'
            0xA0880001, // sb $8, 1($4)
            0x20020004, // addi $2, $0, 4
            0x0000000C, // syscall
        ])
        .unwrap();
    processor.run().unwrap();

    assert_eq!(processor.output(), "Hi");
    assert_eq!(processor.assembly(), "syscall");
    assert_eq!(processor.memory()[&0x1001_0000], 0x4869_0000);
}

#[test]
fn print_integer() {
    let processor = run(
        &[
            0x20020001, // addi $2, $0, 1
            0x2004000F, // addi $4, $0, 15
            0x0000000C, // syscall
        ],
        "",
    );

    assert_eq!(processor.output(), "15");
}

#[test]
fn read_integer_from_input() {
    let processor = run(
        &[
            0x20020005, // addi $2, $0, 5
            0x0000000C, // syscall
            0x00421820, // add $3, $2, $2
        ],
        "21\n",
    );

    assert_eq!(register(&processor, 3), 42);
}

#[test]
fn reset_clears_previous_run() {
    let mut processor = run(&[0x20010005], "");
    processor.reset();

    assert_eq!(processor.state(), State::Idle);
    assert!(processor.memory().is_empty());
    assert_eq!(processor.assembly(), "");
    assert!(processor
        .registers()
        .iter()
        .all(|(id, value)| *value == 0
            || *id == RegisterId::Pc
            || *id == RegisterId::General(28)
            || *id == RegisterId::General(29)));
}
