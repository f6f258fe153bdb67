//! Form drafts
//!
//! A draft is the transient, all-text state of a creation or edit form.
//! Building a draft performs the only validation the tool does: required
//! fields must be non-empty and date fields must parse.

use crate::entities::{
    parse_iso_date, ContactMethod, Intervention, Rating, RiskKind, RiskOrIssue, ScheduleItem,
    ScheduleStatus, Stakeholder, Strategy,
};
use crate::error::{require, ModelError};

/// Strategy form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategyDraft {
    pub title: String,
    pub description: String,
    pub owner: String,
    pub reference_info: String,
}

impl StrategyDraft {
    /// Validate and build the record
    ///
    /// # Errors
    /// Returns [`ModelError::MissingField`] for the first blank field
    pub fn build(&self) -> Result<Strategy, ModelError> {
        require("title", &self.title)?;
        require("description", &self.description)?;
        require("owner", &self.owner)?;
        require("reference_info", &self.reference_info)?;
        Ok(Strategy {
            title: self.title.clone(),
            description: self.description.clone(),
            owner: self.owner.clone(),
            reference_info: self.reference_info.clone(),
        })
    }
}

impl From<&Strategy> for StrategyDraft {
    fn from(s: &Strategy) -> Self {
        Self {
            title: s.title.clone(),
            description: s.description.clone(),
            owner: s.owner.clone(),
            reference_info: s.reference_info.clone(),
        }
    }
}

/// Intervention form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterventionDraft {
    pub title: String,
    pub description: String,
    pub owner: String,
    /// `YYYY-MM-DD`
    pub target_end_date: String,
}

impl InterventionDraft {
    /// Validate and build the record
    ///
    /// # Errors
    /// Returns [`ModelError::MissingField`] or [`ModelError::InvalidDate`]
    pub fn build(&self) -> Result<Intervention, ModelError> {
        require("title", &self.title)?;
        require("description", &self.description)?;
        require("owner", &self.owner)?;
        let target_end_date = parse_iso_date("target_end_date", &self.target_end_date)?;
        Ok(Intervention {
            title: self.title.clone(),
            description: self.description.clone(),
            owner: self.owner.clone(),
            target_end_date,
        })
    }
}

impl From<&Intervention> for InterventionDraft {
    fn from(i: &Intervention) -> Self {
        Self {
            title: i.title.clone(),
            description: i.description.clone(),
            owner: i.owner.clone(),
            target_end_date: i.target_end_date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Schedule item form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleDraft {
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`
    pub end_date: String,
    pub status: ScheduleStatus,
}

impl ScheduleDraft {
    /// Validate and build the record
    ///
    /// Reversed dates are accepted.
    ///
    /// # Errors
    /// Returns [`ModelError::MissingField`] or [`ModelError::InvalidDate`]
    pub fn build(&self) -> Result<ScheduleItem, ModelError> {
        require("title", &self.title)?;
        require("description", &self.description)?;
        let start_date = parse_iso_date("start_date", &self.start_date)?;
        let end_date = parse_iso_date("end_date", &self.end_date)?;
        Ok(ScheduleItem {
            title: self.title.clone(),
            description: self.description.clone(),
            start_date,
            end_date,
            status: self.status,
        })
    }
}

impl From<&ScheduleItem> for ScheduleDraft {
    fn from(item: &ScheduleItem) -> Self {
        Self {
            title: item.title.clone(),
            description: item.description.clone(),
            start_date: item.start_date.format("%Y-%m-%d").to_string(),
            end_date: item.end_date.format("%Y-%m-%d").to_string(),
            status: item.status,
        }
    }
}

/// One row of the risks and issues form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RiskDraft {
    pub intervention_title: String,
    pub kind: RiskKind,
    pub description: String,
    pub likelihood: Rating,
    pub impact: Rating,
    pub mitigation: String,
    pub post_mitigation_likelihood: Rating,
    pub post_mitigation_impact: Rating,
    pub comment: String,
}

impl RiskDraft {
    /// Check if no free-text field has been filled in
    #[must_use]
    pub fn is_blank(&self) -> bool {
        [
            &self.intervention_title,
            &self.description,
            &self.mitigation,
            &self.comment,
        ]
        .iter()
        .all(|s| s.trim().is_empty())
    }

    /// Validate and build the record
    ///
    /// # Errors
    /// Returns [`ModelError::MissingField`] when the description is blank
    pub fn build(&self) -> Result<RiskOrIssue, ModelError> {
        require("description", &self.description)?;
        Ok(RiskOrIssue {
            intervention_title: self.intervention_title.clone(),
            kind: self.kind,
            description: self.description.clone(),
            likelihood: self.likelihood,
            impact: self.impact,
            mitigation: self.mitigation.clone(),
            post_mitigation_likelihood: self.post_mitigation_likelihood,
            post_mitigation_impact: self.post_mitigation_impact,
            comment: self.comment.clone(),
        })
    }
}

impl From<&RiskOrIssue> for RiskDraft {
    fn from(r: &RiskOrIssue) -> Self {
        Self {
            intervention_title: r.intervention_title.clone(),
            kind: r.kind,
            description: r.description.clone(),
            likelihood: r.likelihood,
            impact: r.impact,
            mitigation: r.mitigation.clone(),
            post_mitigation_likelihood: r.post_mitigation_likelihood,
            post_mitigation_impact: r.post_mitigation_impact,
            comment: r.comment.clone(),
        }
    }
}

/// One row of the stakeholder form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StakeholderDraft {
    pub name: String,
    pub role: String,
    pub email: String,
    pub phone: String,
    pub preferred_contact: ContactMethod,
    pub comment: String,
}

impl StakeholderDraft {
    /// Check if no free-text field has been filled in
    #[must_use]
    pub fn is_blank(&self) -> bool {
        [&self.name, &self.role, &self.email, &self.phone, &self.comment]
            .iter()
            .all(|s| s.trim().is_empty())
    }

    /// Validate and build the record
    ///
    /// # Errors
    /// Returns [`ModelError::MissingField`] when the name is blank
    pub fn build(&self) -> Result<Stakeholder, ModelError> {
        require("name", &self.name)?;
        Ok(Stakeholder {
            name: self.name.clone(),
            role: self.role.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            preferred_contact: self.preferred_contact,
            comment: self.comment.clone(),
        })
    }
}

impl From<&Stakeholder> for StakeholderDraft {
    fn from(s: &Stakeholder) -> Self {
        Self {
            name: s.name.clone(),
            role: s.role.clone(),
            email: s.email.clone(),
            phone: s.phone.clone(),
            preferred_contact: s.preferred_contact,
            comment: s.comment.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn full_strategy() -> StrategyDraft {
        StrategyDraft {
            title: "A".into(),
            description: "desc".into(),
            owner: "owner".into(),
            reference_info: "refs".into(),
        }
    }

    #[test]
    fn strategy_requires_every_field() {
        assert!(full_strategy().build().is_ok());

        let mut draft = full_strategy();
        draft.owner.clear();
        assert_eq!(draft.build(), Err(ModelError::MissingField("owner")));

        let mut draft = full_strategy();
        draft.reference_info = " ".into();
        assert_eq!(draft.build(), Err(ModelError::MissingField("reference_info")));
    }

    #[test]
    fn strategy_draft_round_trips_record() {
        let strategy = full_strategy().build().unwrap();
        assert_eq!(StrategyDraft::from(&strategy), full_strategy());
    }

    #[test]
    fn schedule_accepts_reversed_dates() {
        let draft = ScheduleDraft {
            title: "Pilot".into(),
            description: "first site".into(),
            start_date: "2024-05-10".into(),
            end_date: "2024-05-01".into(),
            status: ScheduleStatus::InProgress,
        };
        let item = draft.build().unwrap();
        assert_eq!(item.start_date, NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
        assert_eq!(ScheduleDraft::from(&item), draft);
    }

    #[test]
    fn schedule_rejects_missing_date() {
        let draft = ScheduleDraft {
            title: "Pilot".into(),
            description: "first site".into(),
            start_date: "2024-05-10".into(),
            ..ScheduleDraft::default()
        };
        assert_eq!(draft.build(), Err(ModelError::MissingField("end_date")));
    }

    #[test]
    fn intervention_rejects_bad_date() {
        let draft = InterventionDraft {
            title: "Hire".into(),
            description: "two nurses".into(),
            owner: "HR".into(),
            target_end_date: "31/12/2024".into(),
        };
        assert!(matches!(draft.build(), Err(ModelError::InvalidDate { .. })));
    }

    #[test]
    fn blank_rows() {
        assert!(RiskDraft::default().is_blank());
        assert!(StakeholderDraft::default().is_blank());

        let risk = RiskDraft {
            comment: "watch".into(),
            ..RiskDraft::default()
        };
        assert!(!risk.is_blank());
        assert_eq!(risk.build(), Err(ModelError::MissingField("description")));
    }

    #[test]
    fn stakeholder_requires_name() {
        let draft = StakeholderDraft {
            name: "Sam".into(),
            preferred_contact: ContactMethod::Phone,
            ..StakeholderDraft::default()
        };
        let s = draft.build().unwrap();
        assert_eq!(s.preferred_contact, ContactMethod::Phone);
        assert!(StakeholderDraft::default().build().is_err());
    }
}
