/// Result of an externally triggered code import, delivered once through the
/// repository's event channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TotpCodeResult {
    /// A single provisioning URI was scanned.
    TotpCodeScan(String),
    /// A Google Authenticator export payload was scanned.
    GoogleExportScan(String),
    /// Scanning failed or the scanned data was not understood.
    CodeScanningError,
}
