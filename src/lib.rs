pub mod organizer_core;
