//! End-to-end scenarios over the public API.

use partint::{load_script, parse_script, Int64, Int8, Lattice, Session};
use std::path::PathBuf;

fn demo_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

#[test]
fn unknown_low_bit_plus_two() {
    let a = Int64::new("00u");
    let b = Int64::new("001");
    let c = Int64::new("001");

    for sum in [a.add(&b).add(&c), b.add(&a).add(&c), a.add(&b.add(&c))] {
        assert_eq!(sum.write(true), "1u");
        assert!(sum.admits(2));
        assert!(sum.admits(3));
        assert!(!sum.admits(1));
        assert!(!sum.admits(4));
    }
}

#[test]
fn exact_sum_is_record_equal() {
    let sum = Int64::new("111001").add(&Int64::new("10000101"));
    assert_eq!(sum, Int64::new("10111110"));
    assert_eq!(sum.to_constant(), Some(190));
    for rejected in [191u64, 95, 382] {
        assert!(!sum.admits(rejected));
    }
}

#[test]
fn sum_with_unknowns_keeps_low_byte_range() {
    // 0b111x_x111 (231, 239, 247, 255) plus 0b1_0000_1011 (267).
    let a = Int64::new("111uu111");
    let b = Int64::new("100001011");
    let sum = a.add(&b);

    let expected: Vec<u64> = (0..256u64).filter(|&x| a.admits(x)).map(|x| x + 267).collect();
    assert_eq!(expected, vec![498, 506, 514, 522]);

    let admitted: Vec<u64> = (0..1024u64).filter(|&n| sum.admits(n)).collect();
    assert_eq!(admitted, expected);
    assert_eq!(sum.write(true), "uuuuuuu010");
}

#[test]
fn negation_matches_twos_complement() {
    for n in 0..=255u64 {
        assert_eq!(Int8::constant(n).negate().to_constant(), Some(n.wrapping_neg() & 0xFF));
    }
    assert_eq!(-Int64::constant(5), Int64::constant(5u64.wrapping_neg()));
}

#[test]
fn unit_literals() {
    assert_eq!(Int64::from_unit(0).write(true), "0");
    assert_eq!(Int64::from_unit(1).write(true), "1");
    assert!(Int64::try_from(7u64).is_err());
}

#[test]
fn contradiction_renders_as_t() {
    let m = Int8::constant(1).meet(&Int8::constant(2));
    let text = m.write(false);
    assert!(text.contains('T'));
    assert!((0..256).all(|n| !m.admits(n)));
}

#[test]
fn demo_scripts_run_clean() {
    for name in ["carries.pis", "products.pis"] {
        let script = load_script(demo_path(name)).unwrap();
        let mut session = Session::<64, 6>::new();
        session.run(&script).unwrap_or_else(|e| panic!("{}: {}", name, e));
        assert_eq!(session.executed, script.len());
    }
}

#[test]
fn carries_script_output() {
    let script = load_script(demo_path("carries.pis")).unwrap();
    let output = Session::<64, 6>::new().run(&script).unwrap();
    assert_eq!(output, vec!["abc = 1u", "s = 10111110"]);
}

#[test]
fn session_reuses_variables_across_runs() {
    let mut session = Session::<8, 4>::new();
    session.run(&parse_script("CONST a 200").unwrap()).unwrap();
    let output = session.run(&parse_script("ADD b a a\nPRINT b").unwrap()).unwrap();
    assert_eq!(output, vec!["b = 10010000"]);
    assert_eq!(session.output().len(), 1);
}
