pub mod exports;
pub mod import_record;
pub mod module_id;
pub mod output_asset;
pub mod patch_buffer;
pub mod raw_idx;
pub mod source_joiner;
