//! Zero-Cost Safety Macros
//!
//! In Debug mode: Normal bounds-checked access (panics with useful errors)
//! In Release mode: Unsafe unchecked access (zero overhead)
//!
//! Only use on indices that were already validated (the grid clamps every
//! cell index before linearising it).
//!
//! Usage:
//! ```rust
//! use gridbox_engine::fast;
//!
//! let cells = vec![10, 20, 30, 40];
//! let columns = 2;
//! let (cx, cy) = (1, 1);
//! // Read: fast!(slice, [index])
//! let v = *fast!(cells, [cy * columns + cx]);
//! assert_eq!(v, 40);
//!
//! let mut lists = vec![Vec::<u32>::new(); 4];
//! // Mutable borrow: fast!(mut slice, [index])
//! fast!(mut lists, [cy * columns + cx]).push(3);
//! assert_eq!(lists[3], vec![3]);
//! ```

/// Bounds-checked in debug, unchecked in release.
#[macro_export]
macro_rules! fast {
    // Mutable borrow: fast!(mut slice, [index])
    (mut $slice:expr, [$index:expr]) => {{
        #[cfg(debug_assertions)]
        {
            &mut $slice[$index]
        }
        #[cfg(not(debug_assertions))]
        {
            #[allow(unused_unsafe)]
            unsafe { $slice.get_unchecked_mut($index) }
        }
    }};

    // Read pattern: fast!(slice, [index])
    ($slice:expr, [$index:expr]) => {{
        #[cfg(debug_assertions)]
        {
            &$slice[$index]
        }
        #[cfg(not(debug_assertions))]
        {
            #[allow(unused_unsafe)]
            unsafe { $slice.get_unchecked($index) }
        }
    }};
}
