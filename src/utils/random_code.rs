use rand::Rng;

const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// 生成随机邀请码（去掉了易混淆的 0/O、1/I）
pub fn generate_random_code(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_length_and_charset() {
        let code = generate_random_code(8);
        assert_eq!(code.len(), 8);
        assert!(code.bytes().all(|b| CHARSET.contains(&b)));
        assert!(crate::utils::validate::validate_invite_code(&code).is_ok());
    }
}
