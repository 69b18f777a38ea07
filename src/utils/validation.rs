use crate::error::{AppError, AppResult};
use crate::models::BankAccount;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

static POSTAL_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}-?\d{4}$").expect("valid postal code regex"));

// 口座名義: 全角/半角カナ、英大文字、数字、空格、括号、句点、长音、连字符
static ACCOUNT_HOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\x{30A0}-\x{30FF}\x{FF65}-\x{FF9F}A-Z0-9 \x{3000}()（）.．\-ー]+$")
        .expect("valid account holder regex")
});

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> AppResult<()> {
    if email.len() > 255 || !EMAIL_RE.is_match(email) {
        return Err(AppError::ValidationError("Invalid email address".to_string()));
    }
    Ok(())
}

/// 只接受 http(s) 链接
pub fn validate_http_url(field: &str, url: &str) -> AppResult<()> {
    let url = url.trim();
    let ok = (url.starts_with("https://") || url.starts_with("http://"))
        && url.len() > "https://".len()
        && !url.chars().any(char::is_whitespace);
    if !ok {
        return Err(AppError::ValidationError(format!(
            "{field} must be a valid http(s) URL"
        )));
    }
    Ok(())
}

pub fn validate_postal_code(code: &str) -> AppResult<()> {
    if !POSTAL_CODE_RE.is_match(&to_ascii_digits(code.trim())) {
        return Err(AppError::ValidationError(
            "Postal code must be in the form 123-4567".to_string(),
        ));
    }
    Ok(())
}

pub fn require_non_empty(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::ValidationError(format!("{field} is required")));
    }
    Ok(())
}

/// 全角数字转半角，其余字符保持不变
pub fn to_ascii_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// 去掉连字符与空格，只保留数字
fn digits_only(raw: &str) -> String {
    to_ascii_digits(raw)
        .chars()
        .filter(|c| !matches!(c, '-' | 'ー' | '－' | ' ' | '\u{3000}'))
        .collect()
}

/// 校验并规范化日本银行转账信息
pub fn validate_bank_account(account: &BankAccount) -> AppResult<BankAccount> {
    require_non_empty("bank_name", &account.bank_name)?;
    require_non_empty("branch_name", &account.branch_name)?;

    let branch_code = digits_only(&account.branch_code);
    if branch_code.len() != 3 || !branch_code.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::ValidationError(
            "Branch code must be exactly 3 digits".to_string(),
        ));
    }

    let account_number = digits_only(&account.account_number);
    if account_number.len() != 7 || !account_number.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::ValidationError(
            "Account number must be exactly 7 digits".to_string(),
        ));
    }

    let holder = account.account_holder.trim();
    require_non_empty("account_holder", holder)?;
    if !ACCOUNT_HOLDER_RE.is_match(holder) {
        return Err(AppError::ValidationError(
            "Account holder must be written in katakana".to_string(),
        ));
    }

    Ok(BankAccount {
        bank_name: account.bank_name.trim().to_string(),
        branch_name: account.branch_name.trim().to_string(),
        branch_code,
        account_type: account.account_type,
        account_number,
        account_holder: holder.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::AccountType;

    fn account() -> BankAccount {
        BankAccount {
            bank_name: "三菱UFJ銀行".to_string(),
            branch_name: "渋谷支店".to_string(),
            branch_code: "135".to_string(),
            account_type: AccountType::Ordinary,
            account_number: "1234567".to_string(),
            account_holder: "ヤマダ ハナコ".to_string(),
        }
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("creator@example.jp").is_ok());
        assert!(validate_email("a.b+c@sub.example.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("x@y").is_err());
        assert_eq!(normalize_email("  Foo@Example.JP "), "foo@example.jp");
    }

    #[test]
    fn test_validate_http_url() {
        assert!(validate_http_url("video_url", "https://youtu.be/abc").is_ok());
        assert!(validate_http_url("video_url", "ftp://host/file").is_err());
        assert!(validate_http_url("video_url", "https://").is_err());
        assert!(validate_http_url("video_url", "https://a b").is_err());
    }

    #[test]
    fn test_validate_postal_code() {
        assert!(validate_postal_code("150-0001").is_ok());
        assert!(validate_postal_code("1500001").is_ok());
        assert!(validate_postal_code("１５０-０００１").is_ok());
        assert!(validate_postal_code("15-0001").is_err());
    }

    #[test]
    fn test_bank_account_valid_and_normalized() {
        let mut input = account();
        input.account_number = "１２３-４５６７".to_string();
        let normalized = validate_bank_account(&input).unwrap();
        assert_eq!(normalized.account_number, "1234567");
        assert_eq!(normalized.branch_code, "135");
    }

    #[test]
    fn test_bank_account_rejections() {
        let mut a = account();
        a.branch_code = "12".to_string();
        assert!(validate_bank_account(&a).is_err());

        let mut a = account();
        a.account_number = "123456".to_string();
        assert!(validate_bank_account(&a).is_err());

        let mut a = account();
        a.account_holder = "山田花子".to_string();
        assert!(validate_bank_account(&a).is_err());

        let mut a = account();
        a.bank_name = "  ".to_string();
        assert!(validate_bank_account(&a).is_err());
    }

    #[test]
    fn test_account_holder_accepts_halfwidth_and_corporate() {
        let mut a = account();
        a.account_holder = "ﾔﾏﾀﾞ ﾊﾅｺ".to_string();
        assert!(validate_bank_account(&a).is_ok());

        a.account_holder = "カ）シーネック".to_string();
        assert!(validate_bank_account(&a).is_ok());
    }
}
