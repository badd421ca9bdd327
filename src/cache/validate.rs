use std::borrow::Cow;
use std::rc::Rc;
use std::sync::Arc;

use super::error::CacheError;

/// Decides whether a key or value is unusable as a cache entry.
///
/// Textual types are blank when empty or all whitespace. `Option::None` is
/// blank for every payload type. Everything else is never blank, which is what
/// the default method returns, so a custom type opts in with an empty impl:
///
/// ```
/// use ttl_cache::Blank;
///
/// struct Forecast {
///     celsius: f32,
/// }
///
/// impl Blank for Forecast {}
/// ```
pub trait Blank {
    fn is_blank(&self) -> bool {
        false
    }
}

impl Blank for str {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.as_str().is_blank()
    }
}

impl Blank for Cow<'_, str> {
    fn is_blank(&self) -> bool {
        self.as_ref().is_blank()
    }
}

impl<T: Blank> Blank for Option<T> {
    fn is_blank(&self) -> bool {
        match self {
            Some(inner) => inner.is_blank(),
            None => true,
        }
    }
}

impl<T: Blank + ?Sized> Blank for &T {
    fn is_blank(&self) -> bool {
        (**self).is_blank()
    }
}

impl<T: Blank + ?Sized> Blank for Box<T> {
    fn is_blank(&self) -> bool {
        (**self).is_blank()
    }
}

impl<T: Blank + ?Sized> Blank for Arc<T> {
    fn is_blank(&self) -> bool {
        (**self).is_blank()
    }
}

impl<T: Blank + ?Sized> Blank for Rc<T> {
    fn is_blank(&self) -> bool {
        (**self).is_blank()
    }
}

impl<T> Blank for Vec<T> {}

macro_rules! never_blank {
    ($($t:ty),* $(,)?) => {
        $(impl Blank for $t {})*
    };
}

never_blank!(
    (), bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
);

pub fn validate_key<K: Blank + ?Sized>(key: &K) -> Result<(), CacheError> {
    if key.is_blank() {
        return Err(CacheError::InvalidKey);
    }
    Ok(())
}

pub fn validate_value<V: Blank + ?Sized>(value: &V) -> Result<(), CacheError> {
    if value.is_blank() {
        return Err(CacheError::InvalidValue);
    }
    Ok(())
}
