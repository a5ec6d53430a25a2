use lazy_static::lazy_static;
use std::collections::HashMap;

/// Canonical athlete attribute an imported column can resolve to. The set
/// matches what the coach can pick in the remap selector: identity and
/// billing fields, the lift PRs, and the two benchmark times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CanonicalField {
    Name,
    CutDay,
    ReferralSource,
    BackSquat,
    BenchPress,
    Deadlift,
    ShoulderPress,
    FrontSquat,
    CleanRm,
    PushPress,
    Karen,
    Burpees100,
}

impl CanonicalField {
    /// Storage column name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::CutDay => "cut_day",
            Self::ReferralSource => "referral_source",
            Self::BackSquat => "back_squat",
            Self::BenchPress => "bench_press",
            Self::Deadlift => "deadlift",
            Self::ShoulderPress => "shoulder_press",
            Self::FrontSquat => "front_squat",
            Self::CleanRm => "clean_rm",
            Self::PushPress => "push_press",
            Self::Karen => "karen",
            Self::Burpees100 => "burpees_100",
        }
    }

    /// Display label for the remap selector.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Nombre",
            Self::CutDay => "Fecha de Corte",
            Self::ReferralSource => "Como Llegó",
            Self::BackSquat => "Back Squat",
            Self::BenchPress => "Bench Press",
            Self::Deadlift => "Deadlift",
            Self::ShoulderPress => "Shoulder Press",
            Self::FrontSquat => "Front Squat",
            Self::CleanRm => "Clean",
            Self::PushPress => "Push Press",
            Self::Karen => "Karen",
            Self::Burpees100 => "100 Burpees",
        }
    }

    pub fn all() -> &'static [CanonicalField] {
        &[
            Self::Name,
            Self::CutDay,
            Self::ReferralSource,
            Self::BackSquat,
            Self::BenchPress,
            Self::Deadlift,
            Self::ShoulderPress,
            Self::FrontSquat,
            Self::CleanRm,
            Self::PushPress,
            Self::Karen,
            Self::Burpees100,
        ]
    }
}

lazy_static! {
    /// Spreadsheet header synonyms (Spanish and English) to canonical
    /// fields. Keys are lowercase and trimmed; lookup normalizes the raw
    /// header the same way.
    static ref HEADER_ALIASES: HashMap<&'static str, CanonicalField> = {
        use CanonicalField::*;
        HashMap::from([
            ("clientes", Name),
            ("cliente", Name),
            ("nombre", Name),
            ("name", Name),
            ("fecha de corte", CutDay),
            ("fecha_de_corte", CutDay),
            ("corte", CutDay),
            ("como llego", ReferralSource),
            ("como llegó", ReferralSource),
            ("referido", ReferralSource),
            ("referral", ReferralSource),
            ("back squat", BackSquat),
            ("backsquat", BackSquat),
            ("bench press", BenchPress),
            ("benchpress", BenchPress),
            ("bench", BenchPress),
            ("deadlift", Deadlift),
            ("peso muerto", Deadlift),
            ("shoulder press", ShoulderPress),
            ("shoulder p", ShoulderPress),
            ("press hombro", ShoulderPress),
            ("front squat", FrontSquat),
            ("frontsquat", FrontSquat),
            ("clean", CleanRm),
            ("clean rm", CleanRm),
            ("push press", PushPress),
            ("pushpress", PushPress),
            ("karen", Karen),
            ("100 burpees", Burpees100),
            ("burpees", Burpees100),
            ("burpees_100", Burpees100),
        ])
    };
}

/// Resolve a raw spreadsheet header against the alias table. Headers with
/// no entry map to nothing until the operator assigns them manually.
pub fn lookup_header(header: &str) -> Option<CanonicalField> {
    HEADER_ALIASES
        .get(header.trim().to_lowercase().as_str())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spanish_alias_maps_to_deadlift() {
        assert_eq!(lookup_header("Peso Muerto"), Some(CanonicalField::Deadlift));
    }

    #[test]
    fn test_lookup_normalizes_case_and_whitespace() {
        assert_eq!(lookup_header("  NOMBRE "), Some(CanonicalField::Name));
        assert_eq!(lookup_header("Fecha De Corte"), Some(CanonicalField::CutDay));
    }

    #[test]
    fn test_unknown_header_maps_to_nothing() {
        assert_eq!(lookup_header("XYZ"), None);
    }

    #[test]
    fn test_as_str_is_storage_column() {
        assert_eq!(CanonicalField::Burpees100.as_str(), "burpees_100");
        assert_eq!(CanonicalField::CleanRm.as_str(), "clean_rm");
    }
}
