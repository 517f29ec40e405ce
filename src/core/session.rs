//! Converter session state.
//!
//! The session is an immutable value: every user action produces a new
//! `SessionState` through one pure update function. Conversion requests are
//! numbered with tickets so that a response arriving after a newer request
//! was issued is discarded rather than displayed.

use crate::core::conversion::{Conversion, ConversionRequest};
use crate::core::currency::CurrencyEntry;

/// Monotonic identifier for one conversion request within a session.
pub type Ticket = u64;

/// Where the current conversion action stands. The session tracks exactly
/// one displayed outcome; a failure suppresses the previous result.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConversionPhase {
    #[default]
    Idle,
    InFlight {
        ticket: Ticket,
    },
    Done {
        ticket: Ticket,
        conversion: Conversion,
    },
    Failed {
        ticket: Ticket,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    currencies: Vec<CurrencyEntry>,
    from: String,
    to: String,
    amount: Option<f64>,
    phase: ConversionPhase,
    last_ticket: Ticket,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState {
            currencies: Vec::new(),
            from: "USD".to_string(),
            to: "INR".to_string(),
            amount: None,
            phase: ConversionPhase::Idle,
            last_ticket: 0,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn currencies(&self) -> &[CurrencyEntry] {
        &self.currencies
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn amount(&self) -> Option<f64> {
        self.amount
    }

    pub fn phase(&self) -> &ConversionPhase {
        &self.phase
    }

    /// Replaces the directory slot wholesale with a freshly fetched set.
    pub fn with_directory(mut self, entries: Vec<CurrencyEntry>) -> Self {
        self.currencies = entries;
        self
    }

    pub fn select_from(mut self, code: impl Into<String>) -> Self {
        self.from = code.into();
        self
    }

    pub fn select_to(mut self, code: impl Into<String>) -> Self {
        self.to = code.into();
        self
    }

    pub fn set_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Whether `code` appears in the most recently fetched directory. The
    /// providers never check this; hosts use it to warn before converting.
    pub fn knows_code(&self, code: &str) -> bool {
        self.currencies.iter().any(|c| c.code == code)
    }

    /// Host-level precondition: a conversion is only triggered for a
    /// positive amount.
    pub fn can_convert(&self) -> bool {
        matches!(self.amount, Some(a) if a > 0.0)
    }

    /// Issues a new ticket and snapshots the request to send. Returns `None`
    /// when the precondition does not hold.
    pub fn begin_conversion(mut self) -> Option<(Self, Ticket, ConversionRequest)> {
        if !self.can_convert() {
            return None;
        }
        let amount = self.amount.unwrap_or_default();
        let request = ConversionRequest::new(self.from.clone(), self.to.clone(), amount);
        self.last_ticket += 1;
        let ticket = self.last_ticket;
        self.phase = ConversionPhase::InFlight { ticket };
        Some((self, ticket, request))
    }

    /// Applies a successful response. Responses for any ticket other than
    /// the most recently issued one are stale and leave the state unchanged.
    pub fn complete(mut self, ticket: Ticket, conversion: Conversion) -> Self {
        if ticket == self.last_ticket {
            self.phase = ConversionPhase::Done { ticket, conversion };
        }
        self
    }

    /// Applies a failed response. A current failure replaces whatever result
    /// was displayed before; stale failures are discarded.
    pub fn fail(mut self, ticket: Ticket, message: impl Into<String>) -> Self {
        if ticket == self.last_ticket {
            self.phase = ConversionPhase::Failed {
                ticket,
                message: message.into(),
            };
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_conversion(amount: f64) -> Conversion {
        Conversion {
            converted_amount: amount,
            rate: None,
            last_updated: None,
        }
    }

    #[test]
    fn test_defaults_mirror_initial_selection() {
        let state = SessionState::new();
        assert_eq!(state.from(), "USD");
        assert_eq!(state.to(), "INR");
        assert_eq!(state.amount(), None);
        assert_eq!(*state.phase(), ConversionPhase::Idle);
        assert!(state.currencies().is_empty());
    }

    #[test]
    fn test_directory_slot_is_replaced_wholesale() {
        let state = SessionState::new().with_directory(vec![
            CurrencyEntry::new("USD", "United States Dollar"),
            CurrencyEntry::new("EUR", "Euro"),
        ]);
        assert!(state.knows_code("EUR"));

        let state = state.with_directory(vec![CurrencyEntry::new("GBP", "Pound Sterling")]);
        assert!(!state.knows_code("EUR"));
        assert!(state.knows_code("GBP"));
    }

    #[test]
    fn test_can_convert_requires_positive_amount() {
        let state = SessionState::new();
        assert!(!state.can_convert());
        assert!(!state.clone().set_amount(0.0).can_convert());
        assert!(!state.clone().set_amount(-5.0).can_convert());
        assert!(state.set_amount(100.0).can_convert());
    }

    #[test]
    fn test_begin_conversion_refused_without_amount() {
        assert!(SessionState::new().begin_conversion().is_none());
        assert!(
            SessionState::new()
                .set_amount(-1.0)
                .begin_conversion()
                .is_none()
        );
    }

    #[test]
    fn test_begin_conversion_snapshots_request() {
        let (state, ticket, request) = SessionState::new()
            .select_from("EUR")
            .select_to("JPY")
            .set_amount(42.5)
            .begin_conversion()
            .unwrap();

        assert_eq!(ticket, 1);
        assert_eq!(request, ConversionRequest::new("EUR", "JPY", 42.5));
        assert_eq!(*state.phase(), ConversionPhase::InFlight { ticket: 1 });
    }

    #[test]
    fn test_complete_settles_current_ticket() {
        let (state, ticket, _) = SessionState::new()
            .set_amount(100.0)
            .begin_conversion()
            .unwrap();
        let state = state.complete(ticket, sample_conversion(8300.0));

        match state.phase() {
            ConversionPhase::Done { conversion, .. } => {
                assert_eq!(conversion.converted_amount, 8300.0);
            }
            other => panic!("Expected Done, got {other:?}"),
        }
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let (state, first, _) = SessionState::new()
            .set_amount(100.0)
            .begin_conversion()
            .unwrap();
        let (state, second, _) = state.begin_conversion().unwrap();
        assert!(first < second);

        // A late response for the superseded request must not surface.
        let state = state.complete(first, sample_conversion(1.0));
        assert_eq!(*state.phase(), ConversionPhase::InFlight { ticket: second });

        let state = state.complete(second, sample_conversion(2.0));
        match state.phase() {
            ConversionPhase::Done { conversion, .. } => {
                assert_eq!(conversion.converted_amount, 2.0);
            }
            other => panic!("Expected Done, got {other:?}"),
        }
    }

    #[test]
    fn test_failure_suppresses_previous_result() {
        let (state, ticket, _) = SessionState::new()
            .set_amount(100.0)
            .begin_conversion()
            .unwrap();
        let state = state.complete(ticket, sample_conversion(8300.0));

        let (state, ticket, _) = state.begin_conversion().unwrap();
        let state = state.fail(ticket, "Failed to fetch conversion rate!");

        match state.phase() {
            ConversionPhase::Failed { message, .. } => {
                assert_eq!(message, "Failed to fetch conversion rate!");
            }
            other => panic!("Expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_stale_failure_is_discarded() {
        let (state, first, _) = SessionState::new()
            .set_amount(10.0)
            .begin_conversion()
            .unwrap();
        let (state, second, _) = state.begin_conversion().unwrap();

        let state = state.fail(first, "timed out");
        assert_eq!(*state.phase(), ConversionPhase::InFlight { ticket: second });
    }
}
