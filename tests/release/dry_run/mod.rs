mod everything;
mod first_release;
