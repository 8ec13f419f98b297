mod commit_with_missing_manifests;
mod tag;
