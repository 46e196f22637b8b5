use serde::{Deserialize, Serialize};

use crate::wmi::make_from_wmi;

/// Number of characters in a VIN.
pub const VIN_LENGTH: usize = 17;

/// Per-position weights for the check digit sum.
pub const WEIGHTS: [u32; VIN_LENGTH] = [8, 7, 6, 5, 4, 3, 2, 10, 0, 9, 8, 7, 6, 5, 4, 3, 2];

/// Index of the check digit character.
pub const CHECK_DIGIT_INDEX: usize = 8;

/// Index of the model year character.
pub const MODEL_YEAR_INDEX: usize = 9;

/// Index of the assembly plant character.
pub const PLANT_INDEX: usize = 10;

/// Year codes for the 1980-2009 cycle.
const YEAR_CODES_1980: &[(char, i32)] = &[
    ('A', 1980),
    ('B', 1981),
    ('C', 1982),
    ('D', 1983),
    ('E', 1984),
    ('F', 1985),
    ('G', 1986),
    ('H', 1987),
    ('J', 1988),
    ('K', 1989),
    ('L', 1990),
    ('M', 1991),
    ('N', 1992),
    ('P', 1993),
    ('R', 1994),
    ('S', 1995),
    ('T', 1996),
    ('V', 1997),
    ('W', 1998),
    ('X', 1999),
    ('Y', 2000),
    ('1', 2001),
    ('2', 2002),
    ('3', 2003),
    ('4', 2004),
    ('5', 2005),
    ('6', 2006),
    ('7', 2007),
    ('8', 2008),
    ('9', 2009),
];

/// Year codes for the 2010-2039 cycle.
const YEAR_CODES_2010: &[(char, i32)] = &[
    ('A', 2010),
    ('B', 2011),
    ('C', 2012),
    ('D', 2013),
    ('E', 2014),
    ('F', 2015),
    ('G', 2016),
    ('H', 2017),
    ('J', 2018),
    ('K', 2019),
    ('L', 2020),
    ('M', 2021),
    ('N', 2022),
    ('P', 2023),
    ('R', 2024),
    ('S', 2025),
    ('T', 2026),
    ('V', 2027),
    ('W', 2028),
    ('X', 2029),
    ('Y', 2030),
    ('1', 2031),
    ('2', 2032),
    ('3', 2033),
    ('4', 2034),
    ('5', 2035),
    ('6', 2036),
    ('7', 2037),
    ('8', 2038),
    ('9', 2039),
];

/// Errors produced by the structural decoder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VinError {
    #[error("VIN must be 17 characters long (got {length})")]
    InvalidLength { length: usize },
}

/// Outcome of the check digit validation.
///
/// `Unknown` means at least one character could not be transliterated
/// (I, O, Q or anything outside `0-9A-Z`), so no verdict is possible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckDigit {
    Valid,
    Invalid,
    Unknown,
}

impl CheckDigit {
    /// Collapse into the nullable boolean used by stored records.
    pub fn as_option(self) -> Option<bool> {
        match self {
            Self::Valid => Some(true),
            Self::Invalid => Some(false),
            Self::Unknown => None,
        }
    }
}

impl From<Option<bool>> for CheckDigit {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::Valid,
            Some(false) => Self::Invalid,
            None => Self::Unknown,
        }
    }
}


/// Structural decode of a VIN.
///
/// Optional fields are omitted from the serialized form when absent;
/// `vin`, `wmi`, `vds` and `vis` are always present.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DecodedVin {
    /// Normalized (uppercase) VIN.
    #[schema(example = "1M8GDM9AXKP042788")]
    pub vin: String,
    /// World Manufacturer Identifier (characters 1-3).
    #[schema(example = "1M8")]
    pub wmi: String,
    /// Vehicle Descriptor Section (characters 4-9).
    #[schema(example = "GDM9AX")]
    pub vds: String,
    /// Vehicle Identifier Section (characters 10-17).
    #[schema(example = "KP042788")]
    pub vis: String,
    /// Best-effort model year, ambiguous across 30-year cycles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 2019)]
    pub model_year: Option<i32>,
    /// Assembly plant code (character 11).
    #[schema(value_type = String, example = "P")]
    pub plant: char,
    /// Omitted when the VIN contains characters that cannot be transliterated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_check_digit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Motor Coach Industries")]
    pub make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl DecodedVin {
    pub fn check_digit(&self) -> CheckDigit {
        self.valid_check_digit.into()
    }
}

/// Uppercase the ASCII letters of a candidate VIN.
///
/// Character count is preserved: no trimming, and non-ASCII characters are
/// left as they are.
pub fn normalize(candidate: &str) -> String {
    candidate.to_ascii_uppercase()
}

/// Numeric value of a VIN character, or `None` for I/O/Q and anything else
/// outside the transliteration table.
pub fn transliterate(ch: char) -> Option<u32> {
    match ch {
        '0'..='9' => ch.to_digit(10),
        'A' | 'J' => Some(1),
        'B' | 'K' | 'S' => Some(2),
        'C' | 'L' | 'T' => Some(3),
        'D' | 'M' | 'U' => Some(4),
        'E' | 'N' | 'V' => Some(5),
        'F' | 'W' => Some(6),
        'G' | 'P' | 'X' => Some(7),
        'H' | 'Y' => Some(8),
        'R' | 'Z' => Some(9),
        _ => None,
    }
}

/// Validate the check digit of an already normalized 17-character VIN.
///
/// Inputs of any other length yield `Unknown`.
pub fn check_digit(vin: &str) -> CheckDigit {
    let chars: Vec<char> = vin.chars().collect();
    if chars.len() != VIN_LENGTH {
        return CheckDigit::Unknown;
    }

    let mut total = 0u32;
    for (ch, weight) in chars.iter().zip(WEIGHTS) {
        match transliterate(*ch) {
            Some(value) => total += value * weight,
            None => return CheckDigit::Unknown,
        }
    }

    let expected = match total % 11 {
        10 => 'X',
        remainder => char::from(b'0' + remainder as u8),
    };

    if chars[CHECK_DIGIT_INDEX] == expected {
        CheckDigit::Valid
    } else {
        CheckDigit::Invalid
    }
}

/// Resolve a model year code, preferring the 2010-2039 cycle.
pub fn model_year(code: char) -> Option<i32> {
    lookup_year(YEAR_CODES_2010, code).or_else(|| lookup_year(YEAR_CODES_1980, code))
}

fn lookup_year(table: &[(char, i32)], code: char) -> Option<i32> {
    table
        .iter()
        .find(|(c, _)| *c == code)
        .map(|&(_, year)| year)
}

/// Structurally decode a VIN.
///
/// Fails only when the input is not exactly 17 characters as given;
/// unusual characters degrade the check digit to unknown instead.
pub fn decode(candidate: &str) -> Result<DecodedVin, VinError> {
    let length = candidate.chars().count();
    if length != VIN_LENGTH {
        return Err(VinError::InvalidLength { length });
    }

    let vin = normalize(candidate);
    let chars: Vec<char> = vin.chars().collect();

    let wmi: String = chars[..3].iter().collect();
    let vds: String = chars[3..9].iter().collect();
    let vis: String = chars[9..].iter().collect();
    let make = make_from_wmi(&wmi).map(str::to_string);

    Ok(DecodedVin {
        valid_check_digit: check_digit(&vin).as_option(),
        model_year: model_year(chars[MODEL_YEAR_INDEX]),
        plant: chars[PLANT_INDEX],
        vin,
        wmi,
        vds,
        vis,
        make,
        model: None,
    })
}
