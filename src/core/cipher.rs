use crate::domain::model::{CipherKey, ShiftScope, Verification};

pub const SAMPLE_TEXT: &str = "This is a sample text for encryption!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Encrypt,
    Decrypt,
}

impl Direction {
    fn apply(self, shift: i64) -> i64 {
        match self {
            Direction::Encrypt => shift,
            Direction::Decrypt => -shift,
        }
    }
}

impl ShiftScope {
    fn wrap(self) -> i64 {
        match self {
            ShiftScope::Full => 26,
            ShiftScope::Half => 13,
        }
    }
}

/// 規則：
/// - a-m 前移 n*m，n-z 後移 n+m
/// - A-M 後移 n，N-Z 前移 m²
/// - 其他字元不變
pub fn encrypt(text: &str, key: CipherKey, scope: ShiftScope) -> String {
    apply(text, key, scope, Direction::Encrypt)
}

/// 反向位移；半邊依密文字母判斷。
pub fn decrypt(text: &str, key: CipherKey, scope: ShiftScope) -> String {
    apply(text, key, scope, Direction::Decrypt)
}

pub fn verify(original: &str, decrypted: &str) -> Verification {
    if original == decrypted {
        Verification::Match
    } else {
        Verification::Mismatch
    }
}

fn apply(text: &str, key: CipherKey, scope: ShiftScope, direction: Direction) -> String {
    let w = scope.wrap();
    // 先取模再相乘，任何 i64 都不會溢位
    let n = key.n.rem_euclid(w);
    let m = key.m.rem_euclid(w);
    let lower_first = (n * m) % w;
    let lower_second = -((n + m) % w);
    let upper_first = -n;
    let upper_second = (m * m) % w;

    text.chars()
        .map(|c| match c {
            'a'..='m' => rotate(c, b'a', direction.apply(lower_first), scope),
            'n'..='z' => rotate(c, b'a', direction.apply(lower_second), scope),
            'A'..='M' => rotate(c, b'A', direction.apply(upper_first), scope),
            'N'..='Z' => rotate(c, b'A', direction.apply(upper_second), scope),
            other => other,
        })
        .collect()
}

fn rotate(c: char, base: u8, shift: i64, scope: ShiftScope) -> char {
    let index = (c as u8 - base) as i64;
    let rotated = match scope {
        ShiftScope::Full => (index + shift).rem_euclid(26),
        ShiftScope::Half => {
            let half_start = index / 13 * 13;
            half_start + (index - half_start + shift).rem_euclid(13)
        }
    };
    (base + rotated as u8) as char
}
