//! Property-based tests for the address scanner.

use proptest::prelude::*;

use maildiag_lib::{Kind, ParserOptions, THRESHOLD, diagnose, is_email, parse};

mod strategies {
    use super::*;

    /// Every atext character.
    const ATEXT: &[u8] =
        b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!#$%&'*+-/=?^_`{|}~";

    const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

    const LDH: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789-";

    pub fn atom() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(ATEXT.to_vec()), 1..=12)
            .prop_map(|bytes| bytes.into_iter().map(char::from).collect())
    }

    /// Dot-atom local part, at most 64 octets.
    pub fn local_part() -> impl Strategy<Value = String> {
        prop::collection::vec(atom(), 1..=4).prop_map(|atoms| atoms.join("."))
    }

    /// Starts with a letter, never ends with a hyphen.
    pub fn label() -> impl Strategy<Value = String> {
        (
            prop::sample::select(LETTERS.to_vec()),
            prop::collection::vec(prop::sample::select(LDH.to_vec()), 0..=10),
            prop::sample::select(LETTERS.to_vec()),
        )
            .prop_map(|(first, middle, last)| {
                let mut s = String::with_capacity(middle.len() + 2);
                s.push(char::from(first));
                s.extend(middle.into_iter().map(char::from));
                s.push(char::from(last));
                s
            })
    }

    /// Two or more labels, so no single-label warning.
    pub fn domain() -> impl Strategy<Value = String> {
        prop::collection::vec(label(), 2..=4).prop_map(|labels| labels.join("."))
    }

    pub fn address() -> impl Strategy<Value = (String, String)> {
        (local_part(), domain())
    }

    pub fn ipv6_group() -> impl Strategy<Value = String> {
        "[0-9a-fA-F]{1,4}"
    }
}

use strategies::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn dot_atom_addresses_are_valid((local, domain) in address()) {
        let address = format!("{local}@{domain}");
        prop_assert_eq!(diagnose(&address).kind(), Kind::Valid);
    }

    #[test]
    fn parse_is_idempotent(input in "\\PC{0,60}") {
        let options = ParserOptions::standard();
        prop_assert_eq!(parse(&input, &options), parse(&input, &options));
    }

    #[test]
    fn arbitrary_input_never_panics(input in any::<String>()) {
        let report = parse(&input, &ParserOptions::standard());
        prop_assert!(report.worst.code() >= 1);
        prop_assert!(report.diagnoses.contains(&report.worst));
    }

    #[test]
    fn without_at_sign_nothing_is_valid(input in "[ -?A-~]{0,40}") {
        prop_assert!(!is_email(&input));
    }

    #[test]
    fn folding_never_improves_a_verdict((local, domain) in address(), a in atom(), b in atom()) {
        let unfolded = format!("({a} {b}){local}@{domain}");
        let folded = format!("({a}\r\n {b}){local}@{domain}");
        let bare = format!("{local}@{domain}");
        prop_assert!(diagnose(&folded) >= diagnose(&unfolded));
        prop_assert!(diagnose(&unfolded) >= diagnose(&bare));
    }

    #[test]
    fn local_part_length_limit(len in 1usize..=80) {
        let address = format!("{}@example.com", "a".repeat(len));
        let worst = diagnose(&address);
        prop_assert_eq!(worst.kind() == Kind::LocalTooLong, len > 64);
    }

    #[test]
    fn label_length_limit(len in 1usize..=80) {
        let address = format!("test@{}.example.com", "a".repeat(len));
        let worst = diagnose(&address);
        prop_assert_eq!(worst.kind() == Kind::LabelTooLong, len > 63);
    }

    #[test]
    fn ipv4_literals_are_address_literals(octets in any::<[u8; 4]>()) {
        let [a, b, c, d] = octets;
        let address = format!("test@[{a}.{b}.{c}.{d}]");
        prop_assert_eq!(diagnose(&address).kind(), Kind::AddressLiteral);
    }

    #[test]
    fn full_ipv6_literals_are_address_literals(groups in prop::collection::vec(ipv6_group(), 8)) {
        let address = format!("test@[IPv6:{}]", groups.join(":"));
        let worst = diagnose(&address);
        prop_assert_eq!(worst.kind(), Kind::AddressLiteral);
        prop_assert!(worst < THRESHOLD);
    }
}
