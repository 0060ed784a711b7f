//! Shared test utilities for domain testing
//!
//! - `TestDatabase`: PostgreSQL container with migrations applied (feature: "postgres")
//! - `TestDataBuilder`: deterministic test data (always available)
//! - `assertions`: assertion helpers (always available)
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let name = builder.product_name("keyboard");
//! }
//! ```

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Deterministic test data seeded from the test name, so tests sharing a
/// database do not collide.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_product");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.product_name("keyboard"), "test-product-7-keyboard");
    /// ```
    pub fn product_name(&self, suffix: &str) -> String {
        format!("test-product-{}-{}", self.seed, suffix)
    }

    /// A price string in `1.00..=999.99`, stable for a given seed and index.
    pub fn price(&self, index: u64) -> String {
        let cents = (self.seed.wrapping_add(index.wrapping_mul(7919)) % 99_900) + 100;
        format!("{}.{:02}", cents / 100, cents % 100)
    }
}

pub mod assertions {
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Asserts non-increasing order, as listing endpoints return newest first.
    pub fn assert_sorted_desc<T: PartialOrd + std::fmt::Debug>(values: &[T], context: &str) {
        for pair in values.windows(2) {
            assert!(
                pair[0] >= pair[1],
                "{}: {:?} is not in descending order",
                context,
                values
            );
        }
    }
}
