mod defaults_from_file;
mod env;
mod flag_beats_file;
mod path;
