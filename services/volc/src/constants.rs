use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Headers used in volcengine services.
pub const X_DATE: &str = "x-date";
pub const X_TOS_DATE: &str = "x-tos-date";

// Env values used in volcengine services.
pub const VOLC_ACCESSKEY: &str = "VOLC_ACCESSKEY";
pub const VOLC_SECRETKEY: &str = "VOLC_SECRETKEY";
pub const VOLC_REGION: &str = "VOLC_REGION";

// Service names used in the credential scope.
pub const SCOPE_SERVICE_VISUAL: &str = "cv";
pub const SCOPE_SERVICE_STORAGE: &str = "tos";

/// AsciiSet for canonical URI encoding.
///
/// URI encode every byte except the unreserved characters: 'A'-'Z',
/// 'a'-'z', '0'-'9', '-', '.', '_', and '~'. Path separators stay literal.
pub static URI_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// AsciiSet for canonical query encoding.
///
/// Same as [`URI_ENCODE_SET`] but `/` is encoded as well.
pub static QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
