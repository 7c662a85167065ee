//! Cache Key Module
//!
//! Routing a key to its set only needs a signed 32-bit hash, which is a
//! capability of the key type itself.

use std::hash::Hash;

// == Cache Key Trait ==
/// A type usable as a cache key.
///
/// `hash_code` must be a pure function of the key: equal keys return equal
/// codes, and the same key always returns the same code.
pub trait CacheKey: Eq + Hash + Clone {
    /// Signed hash used to pick the owning set.
    fn hash_code(&self) -> i32;

    /// Returns true for the key type's "no key" sentinel, which the cache
    /// rejects as an invalid argument.
    fn is_absent(&self) -> bool {
        false
    }
}

macro_rules! impl_narrow_int_key {
    ($($t:ty),*) => {
        $(
            impl CacheKey for $t {
                fn hash_code(&self) -> i32 {
                    *self as i32
                }
            }
        )*
    };
}

macro_rules! impl_wide_int_key {
    ($($t:ty),*) => {
        $(
            impl CacheKey for $t {
                /// Folds the high half onto the low half.
                fn hash_code(&self) -> i32 {
                    let bits = *self as u64;
                    (bits ^ (bits >> 32)) as i32
                }
            }
        )*
    };
}

impl_narrow_int_key!(i8, i16, i32, u8, u16, u32);
impl_wide_int_key!(i64, u64, isize, usize);

impl CacheKey for char {
    fn hash_code(&self) -> i32 {
        *self as i32
    }
}

impl CacheKey for bool {
    fn hash_code(&self) -> i32 {
        if *self {
            1231
        } else {
            1237
        }
    }
}

/// Polynomial string hash, `s[0]*31^(n-1) + ... + s[n-1]` over UTF-16 code
/// units with wrapping arithmetic.
pub fn string_hash_code(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32))
}

impl CacheKey for String {
    fn hash_code(&self) -> i32 {
        string_hash_code(self)
    }
}

impl CacheKey for &str {
    fn hash_code(&self) -> i32 {
        string_hash_code(self)
    }
}

/// `None` is the absent sentinel; present keys hash like the inner key.
impl<K: CacheKey> CacheKey for Option<K> {
    fn hash_code(&self) -> i32 {
        self.as_ref().map_or(0, CacheKey::hash_code)
    }

    fn is_absent(&self) -> bool {
        match self {
            Some(inner) => inner.is_absent(),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_keys_hash_to_themselves() {
        assert_eq!(42i32.hash_code(), 42);
        assert_eq!((-7i32).hash_code(), -7);
        assert_eq!(i32::MAX.hash_code(), i32::MAX);
        assert_eq!(u32::MAX.hash_code(), -1);
    }

    #[test]
    fn test_wide_int_keys_fold() {
        assert_eq!(5i64.hash_code(), 5);
        assert_eq!((1u64 << 32).hash_code(), 1);
        assert_eq!((-1i64).hash_code(), 0);
    }

    #[test]
    fn test_string_hash_code() {
        assert_eq!("".hash_code(), 0);
        assert_eq!("a".hash_code(), 97);
        assert_eq!("ab".hash_code(), 97 * 31 + 98);
        // Matches the well known value for "hello"
        assert_eq!("hello".to_string().hash_code(), 99162322);
    }

    #[test]
    fn test_string_and_str_agree() {
        let owned = String::from("some key");
        assert_eq!(owned.hash_code(), "some key".hash_code());
    }

    #[test]
    fn test_option_absent_sentinel() {
        let missing: Option<String> = None;
        assert!(missing.is_absent());
        assert!(!Some("k".to_string()).is_absent());
        assert_eq!(Some(17u32).hash_code(), 17);
    }

    #[test]
    fn test_plain_keys_are_never_absent() {
        assert!(!0i32.is_absent());
        assert!(!"".is_absent());
    }
}
