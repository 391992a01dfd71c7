use regex::Regex;

/// 校验邮箱格式
pub fn is_valid_email(email: &str) -> bool {
    let email_regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    email_regex.is_match(email)
}

/// 宽松校验电话号码：数字、空格、括号、加号、连字符
pub fn is_valid_phone(phone: &str) -> bool {
    let phone_regex = Regex::new(r"^\+?[\d\s().-]{7,20}$").unwrap();
    phone_regex.is_match(phone)
}
