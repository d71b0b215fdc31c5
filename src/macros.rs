//! Call-site macros.
//!
//! Every assertion macro captures `file!()` and `line!()` for the failure
//! diagnostic and takes an optional trailing description in `format!`
//! syntax. `fcmp_ok!` picks its tolerance here, at expansion time: the arm
//! without `range = ...` binds [`crate::FCMP_DEFAULT_RANGE`].

/// Source location of the macro call.
#[macro_export]
macro_rules! here {
    () => {
        $crate::Location::new(::std::file!(), ::std::line!())
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __tap_desc {
    () => {
        ::std::string::String::new()
    };
    ($($fmt:tt)+) => {
        ::std::format!($($fmt)+)
    };
}

/// `ok!(tap, cond, "description {}", arg)`
#[macro_export]
macro_rules! ok {
    ($tap:expr, $cond:expr $(, $($fmt:tt)+)?) => {
        $tap.ok_at($crate::here!(), $cond, $crate::__tap_desc!($($($fmt)+)?))
    };
}

#[macro_export]
macro_rules! pass {
    ($tap:expr $(, $($fmt:tt)+)?) => {
        $tap.ok_at($crate::here!(), true, $crate::__tap_desc!($($($fmt)+)?))
    };
}

#[macro_export]
macro_rules! fail {
    ($tap:expr $(, $($fmt:tt)+)?) => {
        $tap.ok_at($crate::here!(), false, $crate::__tap_desc!($($($fmt)+)?))
    };
}

/// Text equality. Operands may be `&str`, `String`, or `Option` of either.
#[macro_export]
macro_rules! is {
    ($tap:expr, $got:expr, $expected:expr $(, $($fmt:tt)+)?) => {
        $tap.is_at(
            $crate::here!(),
            $crate::MaybeStr::maybe_str(&$got),
            $crate::MaybeStr::maybe_str(&$expected),
            $crate::__tap_desc!($($($fmt)+)?),
        )
    };
}

#[macro_export]
macro_rules! isnt {
    ($tap:expr, $got:expr, $expected:expr $(, $($fmt:tt)+)?) => {
        $tap.isnt_at(
            $crate::here!(),
            $crate::MaybeStr::maybe_str(&$got),
            $crate::MaybeStr::maybe_str(&$expected),
            $crate::__tap_desc!($($($fmt)+)?),
        )
    };
}

/// `cmp_ok!(tap, a, "<", b)` on any two primitive integers.
#[macro_export]
macro_rules! cmp_ok {
    ($tap:expr, $a:expr, $op:expr, $b:expr $(, $($fmt:tt)+)?) => {
        $tap.cmp_ok_at(
            $crate::here!(),
            $a,
            $op,
            $b,
            $crate::__tap_desc!($($($fmt)+)?),
        )
    };
}

/// `fcmp_ok!(tap, a, "==", b)` compares within 0.1;
/// `fcmp_ok!(tap, range = r, a, "==", b)` within `r`.
#[macro_export]
macro_rules! fcmp_ok {
    ($tap:expr, range = $range:expr, $a:expr, $op:expr, $b:expr $(, $($fmt:tt)+)?) => {
        $tap.fcmp_ok_at(
            $crate::here!(),
            ($range) as f64,
            ($a) as f64,
            $op,
            ($b) as f64,
            $crate::__tap_desc!($($($fmt)+)?),
        )
    };
    ($tap:expr, $a:expr, $op:expr, $b:expr $(, $($fmt:tt)+)?) => {
        $tap.fcmp_ok_at(
            $crate::here!(),
            $crate::FCMP_DEFAULT_RANGE,
            ($a) as f64,
            $op,
            ($b) as f64,
            $crate::__tap_desc!($($($fmt)+)?),
        )
    };
}

/// Compares the first `n` bytes of two buffers.
#[macro_export]
macro_rules! cmp_mem {
    ($tap:expr, $got:expr, $expected:expr, $n:expr $(, $($fmt:tt)+)?) => {
        $tap.cmp_mem_at(
            $crate::here!(),
            $crate::MaybeBytes::maybe_bytes(&$got),
            $crate::MaybeBytes::maybe_bytes(&$expected),
            $n,
            $crate::__tap_desc!($($($fmt)+)?),
        )
    };
}

#[macro_export]
macro_rules! like {
    ($tap:expr, $got:expr, $pattern:expr $(, $($fmt:tt)+)?) => {
        $tap.like_at(
            $crate::here!(),
            true,
            ::std::convert::AsRef::<str>::as_ref(&$got),
            $pattern,
            $crate::__tap_desc!($($($fmt)+)?),
        )
    };
}

#[macro_export]
macro_rules! unlike {
    ($tap:expr, $got:expr, $pattern:expr $(, $($fmt:tt)+)?) => {
        $tap.like_at(
            $crate::here!(),
            false,
            ::std::convert::AsRef::<str>::as_ref(&$got),
            $pattern,
            $crate::__tap_desc!($($($fmt)+)?),
        )
    };
}

/// `dies_ok!(tap, { std::process::abort(); }, "aborts")`
#[macro_export]
macro_rules! dies_ok {
    ($tap:expr, $code:block $(, $($fmt:tt)+)?) => {
        $tap.dies_ok_at($crate::here!(), || $code, $crate::__tap_desc!($($($fmt)+)?))
    };
}

#[macro_export]
macro_rules! lives_ok {
    ($tap:expr, $code:block $(, $($fmt:tt)+)?) => {
        $tap.lives_ok_at($crate::here!(), || $code, $crate::__tap_desc!($($($fmt)+)?))
    };
}

/// Skips a block of `count` tests when `cond` holds; otherwise runs it.
///
/// ```ignore
/// skip_if!(tap, !have_network(), 2, "no network", {
///     ok!(tap, fetch().is_ok());
///     ok!(tap, upload().is_ok());
/// });
/// ```
#[macro_export]
macro_rules! skip_if {
    ($tap:expr, $cond:expr, $count:expr, $reason:expr, $body:block) => {
        if $cond {
            $tap.skip($count, $reason);
        } else $body
    };
}
