pub mod zone;
pub mod index;
pub mod roles;
pub mod agenda;

pub use zone::VenueZone;
pub use index::{EventIndex, IndexedActivity};
pub use roles::Role;
pub use agenda::{AgendaBuild, AgendaBuilder, AgendaEntry, DayAgenda, PersonalAgenda};
