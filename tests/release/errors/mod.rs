mod both_markers;
mod invalid_config;
mod invalid_manifest;
mod manifest_not_an_object;
mod missing_unreleased;
mod no_changelog;
mod not_an_object;
