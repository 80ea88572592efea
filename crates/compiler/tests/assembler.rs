use compiler::{assemble, disassemble, AssemblyErrorKind, ImageBuilder};
use loader::Loader;
use types::TaskId;
use vm::{Opcode, Status};

fn push(value: u64) -> Vec<u8> {
    let mut bytes = vec![Opcode::Push.as_u8()];
    bytes.extend_from_slice(&value.to_le_bytes());
    bytes
}

#[test]
fn assembles_and_runs_subtraction() {
    let code = assemble("PUSH 5\nPUSH 3\nSUB\nHLT").unwrap();

    let mut expected = push(5);
    expected.extend(push(3));
    expected.push(Opcode::Sub.as_u8());
    expected.push(Opcode::Hlt.as_u8());
    assert_eq!(code, expected);

    let image = ImageBuilder::new(code).build().unwrap();
    let mut vm = Loader::default().load_bytes(&image, TaskId(0)).unwrap();
    for _ in 0..3 {
        vm.step();
    }
    assert_eq!(vm.stack().as_slice(), &[2]);
    assert_eq!(vm.status(), Status::Active);
    vm.step();
    assert_eq!(vm.status(), Status::Finished);
}

#[test]
fn every_mnemonic_maps_to_its_opcode() {
    for op in Opcode::ALL {
        let line = if op.has_immediate() {
            format!("{} 0", op.mnemonic())
        } else {
            op.mnemonic().to_string()
        };
        let code = assemble(&line).unwrap();
        assert_eq!(code[0], op.as_u8(), "{}", line);
        assert_eq!(code.len(), op.encoded_len());
    }
}

#[test]
fn negative_operands_are_twos_complement() {
    let code = assemble("PUSH -1\nPUSH 18446744073709551615\nPUSH +4").unwrap();
    assert_eq!(&code[1..9], &u64::MAX.to_le_bytes());
    assert_eq!(&code[10..18], &u64::MAX.to_le_bytes());
    assert_eq!(&code[19..27], &4u64.to_le_bytes());
}

#[test]
fn blank_lines_and_crlf_are_accepted() {
    let code = assemble("\r\n  PUSH 1\r\n\n\t\nPOP  \r\nHLT\n").unwrap();
    let mut expected = push(1);
    expected.extend([Opcode::Pop.as_u8(), Opcode::Hlt.as_u8()]);
    assert_eq!(code, expected);
    assert!(assemble("").unwrap().is_empty());
}

#[test]
fn unknown_mnemonic_reports_line_location() {
    let source = "PUSH 1\npush 2\nHLT";
    let err = assemble(source).unwrap_err();
    assert_eq!(err.kind, AssemblyErrorKind::UnknownMnemonic("push".into()));
    assert_eq!(err.line, 2);
    assert_eq!(err.offset, 7);
    assert_eq!(err.length, 6);
    assert_eq!(&source[err.offset..err.offset + err.length], "push 2");
}

#[test]
fn operand_presence_must_match_the_opcode() {
    let err = assemble("PUSH").unwrap_err();
    assert_eq!(err.kind, AssemblyErrorKind::MissingOperand("PUSH"));

    let err = assemble("HLT\nADD 3").unwrap_err();
    assert_eq!(err.kind, AssemblyErrorKind::ExtraneousOperand("ADD"));
    assert_eq!(err.line, 2);

    let err = assemble("STVAR 1 2").unwrap_err();
    assert_eq!(err.kind, AssemblyErrorKind::ExtraneousOperand("STVAR"));
}

#[test]
fn malformed_operands_are_rejected() {
    for bad in ["PUSH x", "PUSH 0x10", "PUSH 18446744073709551616", "PUSH -9223372036854775809"] {
        let err = assemble(bad).unwrap_err();
        assert!(
            matches!(err.kind, AssemblyErrorKind::InvalidOperand(_)),
            "{}: {:?}",
            bad,
            err
        );
    }
}

#[test]
fn diagnostic_points_at_the_line() {
    let source = "PUSH 1\nFROB\n";
    let err = assemble(source).unwrap_err();
    let diag = err.render("prog.vmil", source);
    assert!(diag.contains("error: unknown mnemonic `FROB`"));
    assert!(diag.contains("prog.vmil:2"));
    assert!(diag.contains("   2 | FROB"));
    assert!(diag.contains("^^^^"));
}

#[test]
fn disassembly_reads_back_as_source() {
    let source = "PUSH -57\nLDVAR 2\nJIF\nHLT";
    let code = assemble(source).unwrap();
    let listing = disassemble(&code);
    assert_eq!(
        listing,
        vec!["0000: PUSH -57", "0009: LDVAR 2", "0012: JIF", "0013: HLT"]
    );

    let text: Vec<&str> = listing.iter().map(|l| &l[6..]).collect();
    assert_eq!(assemble(&text.join("\n")).unwrap(), code);
}

#[test]
fn disassembly_stops_at_undecodable_bytes() {
    let listing = disassemble(&[Opcode::Dup.as_u8(), 0xff]);
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0], "0000: DUP");
    assert!(listing[1].starts_with("0001: <"));
}
