mod keys;
mod kind;
mod registry;
mod types;

pub use keys::{
    activity_guid_key, grant_key, referent_bucket, referent_index_value, ACTIVITY_SCHEMA,
    ACTIVITY_REFERENT_INDEX, GRANT_SCHEMA, REPORT_SCHEMA, UPLOAD_REQUESTED_ON_INDEX,
    UPLOAD_SCHEMA, UPLOAD_STUDY_INDEX, UPLOAD_STUDY_SCHEMA,
};
pub use kind::{IndexSchema, KindedRecord, RecordKind, StoredRecord, TableSchema};
pub use registry::{decode_document, encode_document, Document, ENTITY_TYPE_ATTR};
pub use types::{
    ActivityType, OAuthAccessGrant, ReportData, ReportDataKey, ScheduledActivity, Upload,
    UploadStatus,
};
