//! Layered configuration resolution.
//!
//! Configuration is folded from five ranked sources, lowest to highest:
//! 1. **Built-in defaults** - `ConfigStore::default()`
//! 2. **Discovered files** - home dotfile, env-var path, working directory
//! 3. **Explicit files** - pinned on the store or passed per session
//! 4. **Inline fragments** - `key: value` strings from the command line
//! 5. **Session fields** - the sparse `SessionConfig` override record
//!
//! ## Merge strategy
//! - Scalar fields: replace-if-set; an unset override never overwrites
//! - Ignore patterns and sample filters: extend, never replace
//! - Extra filename cleaners: prepend to their store counterparts
//! - Unknown keys: collected in the store's open-ended `kwargs` bucket
//!
//! Derived fields (simple template, development plot formats, AI summary
//! implication, profiling implication, the deprecated lint alias) are
//! recomputed at the end of every pass.

mod loader;
mod merge;
mod overrides;
mod resolve;
mod store;

pub use loader::{
    CONFIG_PATH_ENV, find_user_files, implicit_config_paths, load_config_file,
    load_inline_config, load_replace_names, load_sample_names, load_show_hide,
};
pub use merge::deep_merge;
pub use overrides::SessionConfig;
pub use resolve::{ResolveOptions, resolve};
pub use store::{AiProvider, ConfigStore, ModuleOrderEntry, SIMPLE_TEMPLATE, SampleNameSource};
