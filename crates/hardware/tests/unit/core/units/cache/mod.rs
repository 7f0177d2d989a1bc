//! Cache level tests.
