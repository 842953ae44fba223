//! Drop data model
//!
//! `RawDrop` is the working copy of one drop while it is in flight: the
//! fields delivered by the channel adapter plus everything the metadata
//! extractors fill in, and the per-stage completion flags the join logic
//! drives. `MetadataResponse` is an extractor reply, discriminated by the
//! `source` field on the wire.

use serde::{Deserialize, Serialize};

/// One content item moving through the pipeline.
///
/// Field names mirror the JSON produced by the channel adapters
/// (`droplet_*`, `identity_*`). The completion flags are local pipeline
/// state and never cross the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDrop {
    #[serde(rename = "droplet_title")]
    pub title: Option<String>,
    #[serde(rename = "droplet_content")]
    pub content: Option<String>,
    /// Unprocessed content as delivered by the channel.
    #[serde(rename = "droplet_raw")]
    pub raw: Option<String>,
    pub channel: Option<String>,
    #[serde(rename = "droplet_date_pub")]
    pub date_published: Option<String>,
    #[serde(rename = "droplet_orig_id")]
    pub original_id: Option<String>,

    #[serde(rename = "identity_name")]
    pub identity_name: Option<String>,
    #[serde(rename = "identity_username")]
    pub identity_username: Option<String>,
    #[serde(rename = "identity_avatar")]
    pub identity_avatar: Option<String>,
    #[serde(rename = "identity_orig_id")]
    pub identity_original_id: Option<String>,

    /// Destination rivers; seeded by the adapter, overwritten by the
    /// rules stage.
    #[serde(rename = "river_id", default)]
    pub river_ids: Vec<i64>,
    #[serde(rename = "bucket_id", default)]
    pub bucket_ids: Vec<i64>,
    #[serde(default)]
    pub channel_ids: Vec<i64>,
    #[serde(default)]
    pub mark_as_read: bool,

    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub media: Vec<Media>,
    #[serde(default)]
    pub places: Vec<Place>,

    #[serde(skip)]
    pub media_complete: bool,
    #[serde(skip)]
    pub semantics_complete: bool,
    #[serde(skip)]
    pub rules_complete: bool,
}

/// Hyperlink attached to a drop. `original_url` marks the canonical link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    #[serde(default)]
    pub original_url: bool,
}

/// Tag assigned by the semantic extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(rename = "type")]
    pub tag_type: Option<String>,
}

/// Media entry extracted from a drop. `drop_image` marks the entry whose
/// url becomes the drop's representative image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Media {
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    #[serde(default)]
    pub drop_image: bool,
    #[serde(default)]
    pub thumbnails: Vec<Thumbnail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    pub size: Option<String>,
}

/// Geographic place mentioned in a drop.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Reply from one metadata extraction stage.
///
/// The wire carries the whole drop shape plus a `source` discriminator;
/// each variant captures only the fields its stage is allowed to touch,
/// so adding a stage forces every match over replies to handle it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "source")]
pub enum MetadataResponse {
    /// Media extractor reply: media entries and harvested links.
    #[serde(rename = "mediaextractor")]
    Media {
        #[serde(default)]
        media: Vec<Media>,
        #[serde(default)]
        links: Vec<Link>,
    },

    /// Semantic extractor reply: tags and geographic places.
    #[serde(rename = "semantics")]
    Semantics {
        #[serde(default)]
        tags: Vec<Tag>,
        #[serde(default)]
        places: Vec<Place>,
    },

    /// Rules engine reply: destination collections and the read flag.
    #[serde(rename = "rules")]
    Rules {
        #[serde(rename = "river_id", default)]
        river_ids: Vec<i64>,
        #[serde(rename = "bucket_id", default)]
        bucket_ids: Vec<i64>,
        #[serde(default)]
        mark_as_read: bool,
    },
}

impl MetadataResponse {
    /// Stage name as it appears on the wire, for logging.
    pub fn source(&self) -> &'static str {
        match self {
            MetadataResponse::Media { .. } => "mediaextractor",
            MetadataResponse::Semantics { .. } => "semantics",
            MetadataResponse::Rules { .. } => "rules",
        }
    }
}

impl RawDrop {
    /// Merge an extractor reply into this drop and record the stage as
    /// complete.
    ///
    /// Re-applying a stage overwrites its fields with the same values and
    /// leaves the flag set; whether a repeat delivery re-triggers pipeline
    /// transitions is decided by the store, not here.
    pub fn apply(&mut self, response: MetadataResponse) {
        match response {
            MetadataResponse::Media { media, links } => {
                self.media = media;
                self.links = links;
                self.media_complete = true;
            }
            MetadataResponse::Semantics { tags, places } => {
                self.tags = tags;
                self.places = places;
                self.semantics_complete = true;
            }
            MetadataResponse::Rules {
                river_ids,
                bucket_ids,
                mark_as_read,
            } => {
                self.river_ids = river_ids;
                self.bucket_ids = bucket_ids;
                self.mark_as_read = mark_as_read;
                self.rules_complete = true;
            }
        }
    }

    /// True once media and semantic extraction have both replied.
    pub fn extraction_complete(&self) -> bool {
        self.media_complete && self.semantics_complete
    }

    /// True once every stage has replied.
    pub fn fully_complete(&self) -> bool {
        self.media_complete && self.semantics_complete && self.rules_complete
    }
}
