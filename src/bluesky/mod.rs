// Bluesky API access — post records, profiles, image blobs.
//
// Built on the unauthenticated public XRPC API and atrium-api record types.
// Each submodule handles one area of the API surface.

pub mod client;
pub mod images;
pub mod posts;
pub mod profiles;
