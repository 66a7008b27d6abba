quick_error! {
    /// A rapidhash error.
    ///
    /// Hashing bytes never fails. Errors only arise from values the comparable encoder cannot
    /// represent canonically, and from invalid configuration.
    ///
    /// The fields are documented on their variants; `quick_error!` takes no attributes on them.
    #[derive(Debug, Clone, PartialEq, Eq)]
    #[allow(missing_docs)]
    pub enum Error {
        /// A value has no canonical encoding.
        ///
        /// Unordered collections and other shapes without a stable traversal order cannot be
        /// hashed structurally. `tag` is the type tag of the offending value.
        UnsupportedType {
            tag: String,
        } {
            display("hash of unhashable type {}", tag)
            description("Hash of unhashable type.")
        }
        /// A configuration value could not be parsed.
        ///
        /// `key` names the setting (e.g. the environment variable), `value` is the rejected input,
        /// lossily decoded if it was not UTF-8.
        InvalidConfig {
            key: &'static str,
            value: String,
        } {
            display("invalid value {:?} for {}", value, key)
            description("Invalid configuration value.")
        }
    }
}
