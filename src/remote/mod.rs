//! Remote artifact sync
//!
//! Best-effort mirroring of the model artifact to Supabase Storage.
//! Every caller treats failures here as log-and-continue: training never
//! fails because an upload did, and a failed download at startup just
//! leaves the model untrained.

pub mod supabase;

pub use supabase::SupabaseStorage;
