//! Declarative macros for field-based score types.
//!
//! Every fixed-level score shares the same arithmetic, lexicographic
//! ordering, scaling and slash-separated wire format; these macros generate
//! those impls from the field list.

/// Implements a fixed-level score from its field list.
///
/// Each field names the [`ScoreLevel`](super::ScoreLevel) it stands for.
/// The first field decides feasibility. Fields listed with a suffix also
/// get the `"-1hard/5soft"` display form and its parser.
///
/// ```ignore
/// impl_level_score!(HardSoftScore { hard: Hard => "hard", soft: Soft => "soft" } => of);
/// impl_level_score!(SimpleScore { score: Hard } => of);
/// ```
macro_rules! impl_level_score {
    ($type:ident { $($field:ident: $level:ident),+ } => $ctor:ident) => {
        impl $crate::score::traits::Score for $type {
            #[inline]
            fn is_feasible(&self) -> bool {
                [$(self.$field),+][0] >= 0
            }

            #[inline]
            fn zero() -> Self {
                Self::ZERO
            }

            #[inline]
            fn levels_count() -> usize {
                [$(stringify!($field)),+].len()
            }

            fn to_level_numbers(&self) -> Vec<i64> {
                vec![$(self.$field),+]
            }

            fn from_level_numbers(levels: &[i64]) -> Self {
                match levels {
                    [$($field),+] => $type::$ctor($(*$field),+),
                    _ => panic!(
                        "{} requires exactly {} levels, got {}",
                        stringify!($type),
                        <Self as $crate::score::traits::Score>::levels_count(),
                        levels.len()
                    ),
                }
            }

            impl_score_scale!($type { $($field),+ } => $ctor);

            fn level_label(index: usize) -> $crate::score::ScoreLevel {
                let labels = [$($crate::score::ScoreLevel::$level),+];
                match labels.get(index) {
                    Some(label) => *label,
                    None => panic!(
                        "{} has {} levels, got index {}",
                        stringify!($type),
                        labels.len(),
                        index
                    ),
                }
            }
        }

        impl_score_ops!($type { $($field),+ } => $ctor);

        impl std::fmt::Debug for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_tuple(stringify!($type))$(.field(&self.$field))+.finish()
            }
        }
    };
    ($type:ident { $($field:ident: $level:ident => $suffix:literal),+ } => $ctor:ident) => {
        impl_level_score!($type { $($field: $level),+ } => $ctor);

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let parts = [$(format!("{}{}", self.$field, $suffix)),+];
                f.write_str(&parts.join("/"))
            }
        }

        impl_score_parse!($type { $($field => $suffix),+ } => $ctor);
    };
}

/// Generates `Ord`, `PartialOrd`, `Add`, `Sub`, and `Neg`.
///
/// Fields are compared in the order listed, so list the most significant
/// level first.
///
/// # Usage
/// ```ignore
/// impl_score_ops!(HardSoftScore { hard, soft } => of);
/// ```
macro_rules! impl_score_ops {
    ($type:ident { $($field:ident),+ } => $ctor:ident) => {
        impl Ord for $type {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                std::cmp::Ordering::Equal
                    $(.then_with(|| self.$field.cmp(&other.$field)))+
            }
        }

        impl PartialOrd for $type {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl std::ops::Add for $type {
            type Output = Self;

            fn add(self, other: Self) -> Self {
                $type::$ctor( $(self.$field + other.$field),+ )
            }
        }

        impl std::ops::Sub for $type {
            type Output = Self;

            fn sub(self, other: Self) -> Self {
                $type::$ctor( $(self.$field - other.$field),+ )
            }
        }

        impl std::ops::Neg for $type {
            type Output = Self;

            fn neg(self) -> Self {
                $type::$ctor( $(-self.$field),+ )
            }
        }
    };
}

/// Generates `scale`, `multiply`, `divide`, and `abs` inside an
/// `impl Score for Type` block.
macro_rules! impl_score_scale {
    ($type:ident { $($field:ident),+ } => $ctor:ident) => {
        fn scale(&self, factor: i64) -> Self {
            $type::$ctor( $( self.$field * factor ),+ )
        }

        fn multiply(&self, multiplicand: f64) -> Self {
            $type::$ctor( $( (self.$field as f64 * multiplicand).round() as i64 ),+ )
        }

        fn divide(&self, divisor: f64) -> Self {
            $type::$ctor( $( (self.$field as f64 / divisor).round() as i64 ),+ )
        }

        fn abs(&self) -> Self {
            $type::$ctor( $( self.$field.abs() ),+ )
        }
    };
}

/// Generates `ParseableScore` for the `"Xsuffix/Ysuffix"` format.
///
/// # Usage
/// ```ignore
/// impl_score_parse!(HardSoftScore { hard => "hard", soft => "soft" } => of);
/// ```
macro_rules! impl_score_parse {
    ($type:ident { $($field:ident => $suffix:literal),+ } => $ctor:ident) => {
        impl $crate::score::traits::ParseableScore for $type {
            fn parse(s: &str) -> Result<Self, $crate::score::traits::ScoreParseError> {
                let s = s.trim();
                let suffixes: &[&str] = &[ $($suffix),+ ];
                let mut parts = s.split('/');

                $(
                    let $field = {
                        let part = parts.next().map(str::trim).ok_or_else(|| {
                            $crate::score::traits::ScoreParseError::new(format!(
                                "invalid {} '{}': expected {} parts separated by '/'",
                                stringify!($type), s, suffixes.len()
                            ))
                        })?;
                        let digits = part.strip_suffix($suffix).ok_or_else(|| {
                            $crate::score::traits::ScoreParseError::new(format!(
                                "{} part '{}' must end with '{}'",
                                stringify!($field), part, $suffix
                            ))
                        })?;
                        digits.parse::<i64>().map_err(|e| {
                            $crate::score::traits::ScoreParseError::new(format!(
                                "invalid {} level '{}': {}",
                                $suffix, digits, e
                            ))
                        })?
                    };
                )+

                if parts.next().is_some() {
                    return Err($crate::score::traits::ScoreParseError::new(format!(
                        "invalid {} '{}': expected {} parts separated by '/'",
                        stringify!($type), s, suffixes.len()
                    )));
                }

                Ok($type::$ctor( $($field),+ ))
            }

            fn to_string_repr(&self) -> String {
                self.to_string()
            }
        }
    };
}
