//! Typed domain separators for canonical hashing.
//!
//! Every hash computation in the workspace selects a domain via [`HashDomain`].
//! This module is the single authority for domain-separator byte strings.
//! Adding a new domain is a single change here: the enum, `as_bytes()`,
//! `ALL`, and `Display` are all generated from the same macro invocation.

/// Declares `HashDomain` enum, `as_bytes()`, `ALL`, and `Display` from one list.
macro_rules! define_hash_domains {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => $bytes:expr
        ),+ $(,)?
    ) => {
        /// Typed domain separator for [`super::hash::canonical_hash`].
        ///
        /// Every variant maps to a unique, null-terminated byte string used as
        /// a SHA-256 prefix.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum HashDomain {
            $(
                $(#[$meta])*
                $variant,
            )+
        }

        impl HashDomain {
            /// The raw domain-separator bytes (null-terminated).
            #[must_use]
            pub const fn as_bytes(&self) -> &'static [u8] {
                match self {
                    $( Self::$variant => $bytes, )+
                }
            }

            /// All domain variants in declaration order.
            pub const ALL: &[HashDomain] = &[
                $( Self::$variant, )+
            ];
        }

        impl core::fmt::Display for HashDomain {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match self {
                    $( Self::$variant => write!(f, stringify!($variant)), )+
                }
            }
        }
    };
}

define_hash_domains! {
    // -----------------------------------------------------------------------
    // Kernel
    // -----------------------------------------------------------------------

    /// Canonical grid snapshot (occupancy + endpoints).
    GridSnapshot => b"PATHTRACE::GRID_SNAPSHOT::V1\0",

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    /// Full frame sequence of one run.
    SearchTrace => b"PATHTRACE::SEARCH_TRACE::V1\0",

    /// Search policy snapshot.
    SearchPolicy => b"PATHTRACE::SEARCH_POLICY::V1\0",

    // -----------------------------------------------------------------------
    // Harness
    // -----------------------------------------------------------------------

    /// Run bundle artifact content hashing.
    RunArtifact => b"PATHTRACE::RUN_ARTIFACT::V1\0",

    /// Run bundle digest (manifest projection).
    RunDigest => b"PATHTRACE::RUN_DIGEST::V1\0",
}
