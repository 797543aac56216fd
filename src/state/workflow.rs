/// The conversion workflow state machine
///
/// Owns the three pieces of session state (original image, converted
/// image, in-flight flag) and every transition between them. The UI
/// layer never mutates these fields directly; it dispatches into the
/// methods below and renders whatever `stage()` reports.

use super::data::EncodedImage;

/// The linear UI flow derived from the state triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// No photo selected yet
    Empty,
    /// A compressed original is loaded, ready to convert
    Uploaded,
    /// Exactly one conversion request is in flight
    Converting,
    /// A converted result is available for download
    Converted,
}

/// Session-local workflow state.
///
/// Invariants:
/// - `converted` is non-empty only while `original` is non-empty
/// - `converting` is true only between `begin_conversion` and the
///   matching `complete_conversion`/`fail_conversion` call
#[derive(Debug, Default)]
pub struct Workflow {
    /// The compressed upload, replaced wholesale on each new photo
    original: Option<EncodedImage>,
    /// The backend's converted result
    converted: Option<EncodedImage>,
    /// Whether a conversion request is currently in flight
    converting: bool,
    /// Ticket of the most recent conversion request. Bumped by
    /// `begin_conversion` and `reset` so a reply that arrives after a
    /// reset (or for a superseded request) can be told apart and dropped.
    ticket: u64,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn original(&self) -> Option<&EncodedImage> {
        self.original.as_ref()
    }

    pub fn converted(&self) -> Option<&EncodedImage> {
        self.converted.as_ref()
    }

    pub fn is_converting(&self) -> bool {
        self.converting
    }

    /// Derive the current UI stage from the state triple
    pub fn stage(&self) -> Stage {
        if self.converting {
            Stage::Converting
        } else if self.converted.is_some() {
            Stage::Converted
        } else if self.original.is_some() {
            Stage::Uploaded
        } else {
            Stage::Empty
        }
    }

    /// Accept a freshly compressed upload.
    ///
    /// Sets the original and clears any previous converted result, so a
    /// new photo always starts its flow from Uploaded. A conversion
    /// still in flight (compression can finish after Convert was
    /// clicked) is superseded: its reply must not pair with this photo,
    /// so the ticket is bumped and the in-flight flag dropped.
    pub fn accept_upload(&mut self, image: EncodedImage) {
        if self.converting {
            self.converting = false;
            self.ticket += 1;
        }

        self.original = Some(image);
        self.converted = None;
    }

    /// Start a conversion.
    ///
    /// Requires a non-empty original; errors (and changes nothing) when
    /// there is none or when a request is already in flight. On success,
    /// drops any previous result, marks the workflow as converting and
    /// hands back the image to send together with the ticket the reply
    /// must present. Dropping the result up front means a failure always
    /// lands back in Uploaded, never in a stale Converted.
    pub fn begin_conversion(&mut self) -> Result<(EncodedImage, u64), String> {
        if self.converting {
            return Err("A conversion is already in progress".to_string());
        }

        let original = self
            .original
            .clone()
            .ok_or_else(|| "Choose a photo before converting".to_string())?;

        self.converted = None;
        self.converting = true;
        self.ticket += 1;

        Ok((original, self.ticket))
    }

    /// Apply a successful backend reply.
    ///
    /// Returns false (and mutates nothing) when the ticket is stale,
    /// i.e. the workflow was reset or a newer request was issued while
    /// this reply was on the wire.
    pub fn complete_conversion(&mut self, ticket: u64, image: EncodedImage) -> bool {
        if ticket != self.ticket {
            return false;
        }

        self.converting = false;
        self.converted = Some(image);
        true
    }

    /// Record a failed backend reply, rolling back to Uploaded.
    ///
    /// Returns false when the ticket is stale and the failure no longer
    /// concerns the current state.
    pub fn fail_conversion(&mut self, ticket: u64) -> bool {
        if ticket != self.ticket {
            return false;
        }

        self.converting = false;
        true
    }

    /// Return to the initial empty state unconditionally.
    ///
    /// Bumps the ticket, so an in-flight reply arriving afterwards is
    /// discarded instead of resurrecting the cleared state.
    pub fn reset(&mut self) {
        self.original = None;
        self.converted = None;
        self.converting = false;
        self.ticket += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(tag: u8) -> EncodedImage {
        EncodedImage::new("image/jpeg", vec![tag; 4])
    }

    #[test]
    fn test_starts_empty() {
        let workflow = Workflow::new();
        assert_eq!(workflow.stage(), Stage::Empty);
        assert!(workflow.original().is_none());
        assert!(workflow.converted().is_none());
        assert!(!workflow.is_converting());
    }

    #[test]
    fn test_upload_reaches_uploaded() {
        let mut workflow = Workflow::new();
        workflow.accept_upload(photo(1));

        assert_eq!(workflow.stage(), Stage::Uploaded);
        assert_eq!(workflow.original(), Some(&photo(1)));
    }

    #[test]
    fn test_upload_clears_previous_result() {
        let mut workflow = Workflow::new();
        workflow.accept_upload(photo(1));
        let (_, ticket) = workflow.begin_conversion().unwrap();
        workflow.complete_conversion(ticket, photo(2));
        assert_eq!(workflow.stage(), Stage::Converted);

        // A new photo restarts the flow from Uploaded
        workflow.accept_upload(photo(3));
        assert_eq!(workflow.stage(), Stage::Uploaded);
        assert!(workflow.converted().is_none());
    }

    #[test]
    fn test_convert_without_upload_is_rejected() {
        let mut workflow = Workflow::new();
        let result = workflow.begin_conversion();

        assert!(result.is_err());
        assert!(!workflow.is_converting());
        assert_eq!(workflow.stage(), Stage::Empty);
    }

    #[test]
    fn test_successful_conversion_flow() {
        let mut workflow = Workflow::new();
        workflow.accept_upload(photo(1));

        let (sent, ticket) = workflow.begin_conversion().unwrap();
        assert_eq!(sent, photo(1));
        assert_eq!(workflow.stage(), Stage::Converting);

        assert!(workflow.complete_conversion(ticket, photo(2)));
        assert_eq!(workflow.stage(), Stage::Converted);
        assert!(!workflow.is_converting());
        assert_eq!(workflow.converted(), Some(&photo(2)));
    }

    #[test]
    fn test_failed_conversion_returns_to_uploaded() {
        let mut workflow = Workflow::new();
        workflow.accept_upload(photo(1));
        let (_, ticket) = workflow.begin_conversion().unwrap();

        assert!(workflow.fail_conversion(ticket));
        assert_eq!(workflow.stage(), Stage::Uploaded);
        assert!(workflow.converted().is_none());
        assert!(!workflow.is_converting());
    }

    #[test]
    fn test_failed_reconversion_returns_to_uploaded() {
        let mut workflow = Workflow::new();
        workflow.accept_upload(photo(1));
        let (_, first) = workflow.begin_conversion().unwrap();
        workflow.complete_conversion(first, photo(2));
        assert_eq!(workflow.stage(), Stage::Converted);

        // Converting again drops the old result up front, so a failure
        // lands in Uploaded instead of resurrecting it
        let (_, second) = workflow.begin_conversion().unwrap();
        assert!(workflow.converted().is_none());

        assert!(workflow.fail_conversion(second));
        assert_eq!(workflow.stage(), Stage::Uploaded);
        assert!(workflow.converted().is_none());
    }

    #[test]
    fn test_upload_during_conversion_supersedes_it() {
        let mut workflow = Workflow::new();
        workflow.accept_upload(photo(1));
        let (_, ticket) = workflow.begin_conversion().unwrap();

        // A second photo's compression finishes while the first one's
        // conversion is still on the wire
        workflow.accept_upload(photo(2));
        assert_eq!(workflow.stage(), Stage::Uploaded);
        assert!(!workflow.is_converting());

        // The first photo's reply must not pair with the second photo
        assert!(!workflow.complete_conversion(ticket, photo(9)));
        assert!(workflow.converted().is_none());
        assert_eq!(workflow.original(), Some(&photo(2)));
    }

    #[test]
    fn test_second_conversion_while_in_flight_is_rejected() {
        let mut workflow = Workflow::new();
        workflow.accept_upload(photo(1));
        workflow.begin_conversion().unwrap();

        assert!(workflow.begin_conversion().is_err());
        assert_eq!(workflow.stage(), Stage::Converting);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut workflow = Workflow::new();
        workflow.accept_upload(photo(1));
        let (_, ticket) = workflow.begin_conversion().unwrap();
        workflow.complete_conversion(ticket, photo(2));

        workflow.reset();
        assert_eq!(workflow.stage(), Stage::Empty);
        assert!(workflow.original().is_none());
        assert!(workflow.converted().is_none());
        assert!(!workflow.is_converting());
    }

    #[test]
    fn test_late_reply_after_reset_is_discarded() {
        let mut workflow = Workflow::new();
        workflow.accept_upload(photo(1));
        let (_, ticket) = workflow.begin_conversion().unwrap();

        // User resets while the request is still on the wire
        workflow.reset();

        assert!(!workflow.complete_conversion(ticket, photo(2)));
        assert_eq!(workflow.stage(), Stage::Empty);
        assert!(workflow.converted().is_none());
    }

    #[test]
    fn test_late_failure_after_reset_is_discarded() {
        let mut workflow = Workflow::new();
        workflow.accept_upload(photo(1));
        let (_, ticket) = workflow.begin_conversion().unwrap();

        workflow.reset();

        assert!(!workflow.fail_conversion(ticket));
        assert_eq!(workflow.stage(), Stage::Empty);
    }

    #[test]
    fn test_stale_ticket_from_superseded_request() {
        let mut workflow = Workflow::new();
        workflow.accept_upload(photo(1));
        let (_, old_ticket) = workflow.begin_conversion().unwrap();
        workflow.fail_conversion(old_ticket);

        // Retry issues a fresh ticket; the old one must no longer apply
        let (_, new_ticket) = workflow.begin_conversion().unwrap();
        assert_ne!(old_ticket, new_ticket);
        assert!(!workflow.complete_conversion(old_ticket, photo(9)));
        assert_eq!(workflow.stage(), Stage::Converting);
    }

    #[test]
    fn test_converted_requires_original() {
        // The invariant "converted implies original" holds across every
        // reachable transition sequence that ends with a result.
        let mut workflow = Workflow::new();
        workflow.accept_upload(photo(1));
        let (_, ticket) = workflow.begin_conversion().unwrap();
        workflow.complete_conversion(ticket, photo(2));

        assert!(workflow.converted().is_some());
        assert!(workflow.original().is_some());
    }
}
