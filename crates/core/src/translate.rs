//! Backend message translation
//!
//! Known English backend phrases are rewritten into Vietnamese user-facing
//! text. Phrases that would reveal which credential was wrong all collapse
//! into [`INVALID_CREDENTIALS_MESSAGE`] so the login form cannot be used to
//! probe for existing accounts.

/// Shared message for every credential failure
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Thông tin đăng nhập không đúng. Vui lòng thử lại.";

/// Ordered phrase table; earlier entries win when several keys match
pub const TRANSLATIONS: &[(&str, &str)] = &[
    ("Account not verified", "Tài khoản chưa được xác thực"),
    (
        "Please verify your account",
        "Vui lòng xác thực tài khoản của bạn",
    ),
    (
        "Unexpected error: Account not verified. Please verify your account.",
        "Tài khoản chưa được xác thực. Vui lòng kiểm tra email để xác thực tài khoản.",
    ),
    ("Invalid verification code", "Mã xác thực không đúng"),
    ("Verification code has expired", "Mã xác thực đã hết hạn"),
    ("Account verified successfully", "Xác thực tài khoản thành công"),
    ("Account is already verified", "Tài khoản đã được xác thực"),
    (
        "OTP has been resent successfully",
        "Đã gửi lại mã OTP thành công",
    ),
    ("User not found", INVALID_CREDENTIALS_MESSAGE),
    ("Username not found", INVALID_CREDENTIALS_MESSAGE),
    ("Email not found", INVALID_CREDENTIALS_MESSAGE),
    ("Username is already in use", "Tên đăng nhập đã tồn tại"),
    ("Email is already in use", "Email đã tồn tại"),
    ("Bad credentials", INVALID_CREDENTIALS_MESSAGE),
    ("Invalid credentials", INVALID_CREDENTIALS_MESSAGE),
    ("Invalid email or password", INVALID_CREDENTIALS_MESSAGE),
];

/// Translate a backend message into user-facing text
///
/// An exact table key returns its mapping. Otherwise every key contained in
/// the message is replaced, walking the table in order. Unknown messages are
/// returned unchanged. Applying this twice gives the same result as once.
///
/// Every contained key is replaced, not only the first one found, and each
/// key is replaced at every occurrence; stopping at the first key would leave
/// untranslated fragments for a second pass to rewrite.
pub fn translate(message: &str) -> String {
    if let Some((_, localized)) = TRANSLATIONS.iter().find(|(key, _)| *key == message) {
        return (*localized).to_string();
    }

    TRANSLATIONS
        .iter()
        .fold(message.to_string(), |text, (key, localized)| {
            if text.contains(key) {
                text.replace(key, localized)
            } else {
                text
            }
        })
}

/// Whether a message has a table entry, exact or contained
#[cfg(test)]
fn is_known(message: &str) -> bool {
    TRANSLATIONS.iter().any(|(key, _)| message.contains(key))
}
