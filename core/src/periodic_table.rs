/// Elements the driver can route to an engine. The discriminant is the
/// atomic number.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Element {
    Hydrogen = 1,
    Helium,
    Lithium,
    Beryllium,
    Boron,
    Carbon,
    Nitrogen,
    Oxygen,
    Fluorine,
    Neon,
    Sodium,
    Magnesium,
    Aluminium,
    Silicon,
    Phosphorus,
    Sulfur,
    Chlorine,
    Argon,
}

impl Element {
    /// Looks an element up by its symbol, as spelled in input files.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "H" => Self::Hydrogen,
            "He" => Self::Helium,
            "Li" => Self::Lithium,
            "Be" => Self::Beryllium,
            "B" => Self::Boron,
            "C" => Self::Carbon,
            "N" => Self::Nitrogen,
            "O" => Self::Oxygen,
            "F" => Self::Fluorine,
            "Ne" => Self::Neon,
            "Na" => Self::Sodium,
            "Mg" => Self::Magnesium,
            "Al" => Self::Aluminium,
            "Si" => Self::Silicon,
            "P" => Self::Phosphorus,
            "S" => Self::Sulfur,
            "Cl" => Self::Chlorine,
            "Ar" => Self::Argon,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Hydrogen => "H",
            Self::Helium => "He",
            Self::Lithium => "Li",
            Self::Beryllium => "Be",
            Self::Boron => "B",
            Self::Carbon => "C",
            Self::Nitrogen => "N",
            Self::Oxygen => "O",
            Self::Fluorine => "F",
            Self::Neon => "Ne",
            Self::Sodium => "Na",
            Self::Magnesium => "Mg",
            Self::Aluminium => "Al",
            Self::Silicon => "Si",
            Self::Phosphorus => "P",
            Self::Sulfur => "S",
            Self::Chlorine => "Cl",
            Self::Argon => "Ar",
        }
    }

    pub fn atomic_number(self) -> u32 {
        self as u32
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
