/// Units of the standard instrument fields. The last character
/// of a standard field's name is an ASCII digit indexing this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Dimensionless,
    Volt,
    MilliAmpere,
    Ampere,
    Celsius,
    Kelvin,
    MilliVolt,
    PicoAmpere,
    NanoAmpere,
    MicroAmpere,
}

const UNIT_TABLE : [Unit; 10] = [
    Unit::Dimensionless,
    Unit::Volt,
    Unit::MilliAmpere,
    Unit::Ampere,
    Unit::Celsius,
    Unit::Kelvin,
    Unit::MilliVolt,
    Unit::PicoAmpere,
    Unit::NanoAmpere,
    Unit::MicroAmpere,
];

impl Unit {
    /// Looks up a numeric unit code, `None` if it is past the table.
    pub fn from_code(code : u8) -> Option<Unit> {
        UNIT_TABLE.get(code as usize).copied()
    }

    /// Looks up the unit for the ASCII digit stored in the file
    pub fn from_ascii_digit(digit : u8) -> Option<Unit> {
        Unit::from_code(digit.checked_sub(b'0')?)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Dimensionless => "",
            Unit::Volt => "V",
            Unit::MilliAmpere => "mA",
            Unit::Ampere => "A",
            Unit::Celsius => "°C",
            Unit::Kelvin => "K",
            Unit::MilliVolt => "mV",
            Unit::PicoAmpere => "pA",
            Unit::NanoAmpere => "nA",
            Unit::MicroAmpere => "µA",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f : &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_endpoints() {
        assert_eq!(Unit::from_code(0).unwrap().symbol(), "");
        assert_eq!(Unit::from_code(9).unwrap().symbol(), "µA");
        assert_eq!(Unit::from_code(4).unwrap().symbol(), "°C");
        assert!(Unit::from_code(10).is_none());
        assert!(Unit::from_code(255).is_none());
    }

    #[test]
    fn ascii_digits() {
        assert_eq!(Unit::from_ascii_digit(b'1'), Some(Unit::Volt));
        assert_eq!(Unit::from_ascii_digit(b'5'), Some(Unit::Kelvin));
        assert!(Unit::from_ascii_digit(b':').is_none());
        assert!(Unit::from_ascii_digit(b' ').is_none());
    }
}
