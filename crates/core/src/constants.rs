//! Constants used throughout the intake core crate.
//!
//! Line positions describe the referral template as produced by PDF text extraction.
//! They are zero-based indices into the document's line sequence.

/// Line holding the referral number as its third space-separated token.
pub const REFERENCE_LINE: usize = 0;

/// Token position of the referral number on [`REFERENCE_LINE`].
pub const REFERENCE_TOKEN: usize = 2;

/// Line holding "Last, First ... (identifier)".
pub const PATIENT_LINE: usize = 1;

/// Line holding the authorization status text.
pub const STATUS_LINE: usize = 2;

/// Received date line on authorized documents.
pub const AUTHORIZED_RECEIVED_LINE: usize = 8;

/// Received date line on denied documents.
pub const DENIED_RECEIVED_LINE: usize = 9;

/// Line holding the urgency label.
pub const URGENCY_LINE: usize = 51;

/// Demographics start around this line; the exact position drifts with the
/// number of procedure codes, so the date of birth is searched for from here.
pub const DEMOGRAPHICS_SCAN_START: usize = 150;

/// Urgency label that marks a referral as not urgent.
pub const ROUTINE_LABEL: &str = "Routine";

/// Anchor preceding the date-of-birth line on authorized documents.
pub const AUTHORIZED_BIRTH_ANCHOR: &str = "Birth: ";

/// Anchor on the date-of-birth line of denied documents.
pub const DENIED_BIRTH_ANCHOR: &str = "Birth:";

/// Substituted for identifiers garbled by a PDF redaction overlay.
pub const MANUAL_REVIEW_SENTINEL: &str = "NEEDS MANUAL REVIEW";

/// Procedure code at the end of a line.
pub const PROCEDURE_CODE_PATTERN: &str = r"[A-Za-z][0-9]{4}\n";

/// Number of procedure code columns available in the sheet.
pub const CODE_SLOTS: usize = 3;

/// Dropdown vocabulary accepted by the sheet's status column.
pub const STATUS_DROPDOWN: [&str; 4] = ["Authorized", "Denied", "Referral only", "Canceled"];

/// Default worksheet name when the config does not set one.
pub const DEFAULT_WORKSHEET: &str = "Sheet1";

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILENAME: &str = "intake.yaml";

/// Default timeout for sink requests.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
