use std::fmt;
use std::str::FromStr;

/// Surface-defect category. The discriminant is the class index the models
/// train and predict on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefectClass {
    Patches = 0,
    Scratches = 1,
}

impl DefectClass {
    /// Every class, ordered by index.
    pub const ALL: [DefectClass; 2] = [DefectClass::Patches, DefectClass::Scratches];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<DefectClass> {
        DefectClass::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            DefectClass::Patches => "patches",
            DefectClass::Scratches => "scratches",
        }
    }

    /// Class names in index order, as stored in model metadata.
    pub fn names() -> Vec<String> {
        DefectClass::ALL.iter().map(|c| c.name().to_string()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownClass(pub String);

impl FromStr for DefectClass {
    type Err = UnknownClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "patches" => Ok(DefectClass::Patches),
            "scratches" => Ok(DefectClass::Scratches),
            other => Err(UnknownClass(other.to_string())),
        }
    }
}

impl fmt::Display for DefectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_is_a_bijection() {
        assert_eq!("patches".parse::<DefectClass>().unwrap().index(), 0);
        assert_eq!("scratches".parse::<DefectClass>().unwrap().index(), 1);
        for class in DefectClass::ALL {
            assert_eq!(DefectClass::from_index(class.index()), Some(class));
            assert_eq!(class.name().parse::<DefectClass>().unwrap(), class);
        }
        assert_eq!(DefectClass::from_index(2), None);
    }

    #[test]
    fn unknown_strings_are_rejected() {
        assert_eq!(
            "Patches".parse::<DefectClass>(),
            Err(UnknownClass("Patches".to_string()))
        );
        assert!("".parse::<DefectClass>().is_err());
        assert_eq!(" scratches ".parse::<DefectClass>(), Ok(DefectClass::Scratches));
    }
}
