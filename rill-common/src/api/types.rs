//! Archival API request/response types
//!
//! The REST API takes a different shape from the queue wire format:
//! camelCase field names, a nested identity block, and a few fields
//! derived from flags on the raw drop (canonical link url, drop image
//! url, content falling back to the title).

use crate::model::RawDrop;
use serde::{Deserialize, Serialize};

/// One drop in the shape the archival API accepts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Drop {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_id: Option<String>,
    /// Url of the link flagged canonical, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    /// Url of the media entry flagged as the drop image, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    pub river_ids: Vec<i64>,
    pub bucket_ids: Vec<i64>,
    pub channel_ids: Vec<i64>,
    pub mark_as_read: bool,

    pub identity: Identity,

    pub links: Vec<DropLink>,
    pub tags: Vec<DropTag>,
    pub media: Vec<DropMedia>,
    pub places: Vec<DropPlace>,
}

/// Source identity of a drop.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Identity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DropLink {
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DropTag {
    pub tag: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub tag_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DropMedia {
    pub url: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    pub thumbnails: Vec<DropThumbnail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DropThumbnail {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DropPlace {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl From<RawDrop> for Drop {
    fn from(raw: RawDrop) -> Self {
        let original_url = raw
            .links
            .iter()
            .find(|l| l.original_url)
            .map(|l| l.url.clone());
        let image = raw.media.iter().find(|m| m.drop_image).map(|m| m.url.clone());

        // An empty content body falls back to the title
        let content = raw
            .content
            .clone()
            .filter(|c| !c.is_empty())
            .or_else(|| raw.title.clone());

        Drop {
            title: raw.title,
            content,
            channel: raw.channel,
            date_published: raw.date_published,
            original_id: raw.original_id,
            original_url,
            image,
            river_ids: raw.river_ids,
            bucket_ids: raw.bucket_ids,
            channel_ids: raw.channel_ids,
            mark_as_read: raw.mark_as_read,
            identity: Identity {
                name: raw.identity_name,
                username: raw.identity_username,
                avatar: raw.identity_avatar,
                origin_id: raw.identity_original_id,
            },
            links: raw
                .links
                .into_iter()
                .map(|l| DropLink { url: l.url })
                .collect(),
            tags: raw
                .tags
                .into_iter()
                .map(|t| DropTag {
                    tag: t.name,
                    tag_type: t.tag_type,
                })
                .collect(),
            media: raw
                .media
                .into_iter()
                .map(|m| DropMedia {
                    url: m.url,
                    media_type: m.media_type,
                    thumbnails: m
                        .thumbnails
                        .into_iter()
                        .map(|t| DropThumbnail {
                            url: t.url,
                            size: t.size,
                        })
                        .collect(),
                })
                .collect(),
            places: raw
                .places
                .into_iter()
                .map(|p| DropPlace {
                    name: p.name,
                    latitude: p.latitude,
                    longitude: p.longitude,
                })
                .collect(),
        }
    }
}
