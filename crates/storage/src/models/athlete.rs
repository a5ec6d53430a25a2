use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Canonical roster row for the `athletes` table.
///
/// Performance metrics are deliberately free-text strings: lift PRs are
/// numeric-looking ("105") but benchmark times use "8:30"-style notation,
/// and the coach edits both through the same cells. Unknown columns coming
/// back from the backend are rejected rather than silently carried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Athlete {
    /// Immutable once assigned; the sole join key for every mutation.
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub payment_status: PaymentStatus,
    /// Day-of-month token for the billing cut, unvalidated free text.
    #[serde(default)]
    pub cut_day: String,
    #[serde(default)]
    pub referral_source: Option<String>,

    // Strength-lift PRs
    #[serde(default)]
    pub back_squat: Option<String>,
    #[serde(default)]
    pub bench_press: Option<String>,
    #[serde(default)]
    pub deadlift: Option<String>,
    #[serde(default)]
    pub shoulder_press: Option<String>,
    #[serde(default)]
    pub front_squat: Option<String>,
    #[serde(default)]
    pub clean_rm: Option<String>,
    #[serde(default)]
    pub push_press: Option<String>,
    #[serde(default)]
    pub snatch_rm: Option<String>,

    // Benchmark times
    #[serde(default)]
    pub karen: Option<String>,
    #[serde(default)]
    pub burpees_100: Option<String>,

    /// Self-login code. Not guaranteed unique.
    #[serde(default)]
    pub access_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Active,
    Pending,
}

impl PaymentStatus {
    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Pending,
            Self::Pending => Self::Active,
        }
    }
}

/// Insert draft: everything the coach provides, identity and timestamp
/// left to the backend.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewAthlete {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub payment_status: PaymentStatus,
    pub cut_day: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_squat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bench_press: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadlift: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shoulder_press: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub front_squat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean_rm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_press: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snatch_rm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub karen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub burpees_100: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_code: Option<String>,
}

impl NewAthlete {
    /// The blank row the dashboard appends on "New Athlete".
    pub fn blank() -> Self {
        Self {
            name: "Nuevo Atleta".to_string(),
            avatar_url: None,
            payment_status: PaymentStatus::Pending,
            cut_day: "01".to_string(),
            referral_source: None,
            back_squat: None,
            bench_press: None,
            deadlift: None,
            shoulder_press: None,
            front_squat: None,
            clean_rm: Some("0".to_string()),
            push_press: None,
            snatch_rm: Some("0".to_string()),
            karen: None,
            burpees_100: None,
            access_code: None,
        }
    }

    /// Materialize the optimistic local record under a temporary id. The
    /// backend-confirmed row replaces it in place once the insert resolves.
    pub fn with_id(self, id: Uuid) -> Athlete {
        Athlete {
            id,
            name: self.name,
            avatar_url: self.avatar_url,
            payment_status: self.payment_status,
            cut_day: self.cut_day,
            referral_source: self.referral_source,
            back_squat: self.back_squat,
            bench_press: self.bench_press,
            deadlift: self.deadlift,
            shoulder_press: self.shoulder_press,
            front_squat: self.front_squat,
            clean_rm: self.clean_rm,
            push_press: self.push_press,
            snatch_rm: self.snatch_rm,
            karen: self.karen,
            burpees_100: self.burpees_100,
            access_code: self.access_code,
            created_at: None,
        }
    }
}

impl Default for NewAthlete {
    fn default() -> Self {
        Self::blank()
    }
}

/// Field-level patch for a single committed edit. `None` fields are left
/// untouched by the merge and omitted from the wire payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AthletePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cut_day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_squat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bench_press: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadlift: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shoulder_press: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub front_squat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean_rm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_press: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snatch_rm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub karen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub burpees_100: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_code: Option<String>,
}

impl AthletePatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn payment_status(status: PaymentStatus) -> Self {
        Self {
            payment_status: Some(status),
            ..Self::default()
        }
    }

    /// Shallow merge onto the target row, mirroring the backend's update
    /// semantics so the optimistic state matches the confirmed one.
    pub fn apply(&self, athlete: &mut Athlete) {
        macro_rules! merge {
            ($field:ident) => {
                if let Some(value) = &self.$field {
                    athlete.$field = Some(value.clone());
                }
            };
        }

        if let Some(name) = &self.name {
            athlete.name = name.clone();
        }
        if let Some(status) = self.payment_status {
            athlete.payment_status = status;
        }
        if let Some(cut_day) = &self.cut_day {
            athlete.cut_day = cut_day.clone();
        }
        merge!(avatar_url);
        merge!(referral_source);
        merge!(back_squat);
        merge!(bench_press);
        merge!(deadlift);
        merge!(shoulder_press);
        merge!(front_squat);
        merge!(clean_rm);
        merge!(push_press);
        merge!(snatch_rm);
        merge!(karen);
        merge!(burpees_100);
        merge!(access_code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn athlete() -> Athlete {
        NewAthlete::blank().with_id(Uuid::new_v4())
    }

    #[test]
    fn test_patch_merges_only_given_fields() {
        let mut a = athlete();
        let before_cut = a.cut_day.clone();

        let patch = AthletePatch {
            deadlift: Some("140".to_string()),
            ..AthletePatch::default()
        };
        patch.apply(&mut a);

        assert_eq!(a.deadlift.as_deref(), Some("140"));
        assert_eq!(a.cut_day, before_cut);
        assert_eq!(a.name, "Nuevo Atleta");
    }

    #[test]
    fn test_payment_status_toggle() {
        assert_eq!(PaymentStatus::Pending.toggled(), PaymentStatus::Active);
        assert_eq!(PaymentStatus::Active.toggled(), PaymentStatus::Pending);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let raw = r#"{"id":"7e0cf108-3b2f-4b5c-9a55-111111111111","name":"Ana","payment_status":"pending","cut_day":"05","mystery_column":1}"#;
        let parsed: std::result::Result<Athlete, _> = serde_json::from_str(raw);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_blank_draft_zeroes_olympic_lifts() {
        let draft = NewAthlete::blank();
        assert_eq!(draft.snatch_rm.as_deref(), Some("0"));
        assert_eq!(draft.clean_rm.as_deref(), Some("0"));
        assert_eq!(draft.cut_day, "01");
        assert_eq!(draft.payment_status, PaymentStatus::Pending);
        assert!(draft.back_squat.is_none());
    }

    #[test]
    fn test_draft_requires_name() {
        let mut draft = NewAthlete::blank();
        draft.name = String::new();
        assert!(draft.validate().is_err());
    }
}
