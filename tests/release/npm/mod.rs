mod all_manifests;
mod missing_version;
mod not_requested;
mod package_json;
