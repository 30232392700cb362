//! Built-in identifiers known at compile time.
//!
//! These occupy the sealed low range of every [`Interner`](crate::Interner):
//! construction interns [`STRINGS`] in declaration order, so each constant
//! below equals the id the interner hands back for its string. Architecture
//! backends intern their own tables on top of this range at load time.

use crate::ident::Ident;

macro_rules! constids {
    ($($name:ident => $s:literal),* $(,)?) => {
        constids!(@consts 0u32; $($name => $s),*);

        /// The built-in strings, in interning order.
        pub const STRINGS: &[&str] = &[$($s),*];

        /// Number of built-in constids; user ids start here.
        pub const COUNT: u32 = STRINGS.len() as u32;
    };
    (@consts $idx:expr; $name:ident => $s:literal $(, $rest:ident => $rs:literal)*) => {
        #[doc = concat!("Built-in id for `", $s, "`.")]
        pub const $name: Ident = Ident::from_raw($idx);
        constids!(@consts $idx + 1; $($rest => $rs),*);
    };
    (@consts $idx:expr;) => {};
}

constids! {
    // Slice LUT input/output ports, per-LUT suffix 0/1.
    A0 => "A0",
    B0 => "B0",
    C0 => "C0",
    D0 => "D0",
    A1 => "A1",
    B1 => "B1",
    C1 => "C1",
    D1 => "D1",
    F0 => "F0",
    F1 => "F1",
    Q0 => "Q0",
    Q1 => "Q1",
    DI0 => "DI0",
    DI1 => "DI1",
    M0 => "M0",
    M1 => "M1",
    // Shared slice control ports.
    CLK => "CLK",
    LSR => "LSR",
    CE => "CE",
    // Carry chain ports.
    CIN => "CIN",
    COUT => "COUT",
    // FF control ports (ALM-class).
    D => "D",
    Q => "Q",
    ENA => "ENA",
    SCLR => "SCLR",
    ACLR => "ACLR",
    // Common parameters and attributes.
    MODE => "MODE",
    CLKMUX => "CLKMUX",
    LSRMUX => "LSRMUX",
    SRMODE => "SRMODE",
    LUT0_INITVAL => "LUT0_INITVAL",
    LUT1_INITVAL => "LUT1_INITVAL",
    INIT => "INIT",
    L6MUX => "L6MUX",
    A0MUX => "A0MUX",
    B0MUX => "B0MUX",
    C0MUX => "C0MUX",
    D0MUX => "D0MUX",
    A1MUX => "A1MUX",
    B1MUX => "B1MUX",
    C1MUX => "C1MUX",
    D1MUX => "D1MUX",
    // Cell and bel types the core rules know about.
    TRELLIS_SLICE => "TRELLIS_SLICE",
    CCU2C => "CCU2C",
    LUT4 => "LUT4",
    DCUA => "DCUA",
    EXTREFB => "EXTREFB",
    PCSCLKDIV => "PCSCLKDIV",
    MISTRAL_COMB => "MISTRAL_COMB",
    MISTRAL_FF => "MISTRAL_FF",
    // Constant nets.
    VCC => "VCC",
    GND => "GND",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_match_string_order() {
        assert_eq!(A0.as_raw(), 0);
        assert_eq!(STRINGS[CLK.as_raw() as usize], "CLK");
        assert_eq!(STRINGS[CCU2C.as_raw() as usize], "CCU2C");
        assert_eq!(STRINGS[GND.as_raw() as usize], "GND");
    }

    #[test]
    fn no_duplicate_strings() {
        let mut seen = std::collections::HashSet::new();
        for s in STRINGS {
            assert!(seen.insert(*s), "duplicate constid string {s:?}");
        }
    }

    #[test]
    fn count_covers_all() {
        assert_eq!(COUNT as usize, STRINGS.len());
        assert!(GND.as_raw() < COUNT);
    }
}
