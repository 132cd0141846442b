//! Name generation for customers

use rand::Rng;

/// Generate a random "Given Family" name
pub fn generate_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let given = GIVEN_NAMES[rng.gen_range(0..GIVEN_NAMES.len())];
    let family = FAMILY_NAMES[rng.gen_range(0..FAMILY_NAMES.len())];
    format!("{} {}", given, family)
}

static GIVEN_NAMES: &[&str] = &[
    "James", "John", "Robert", "Michael", "William", "David", "Joseph", "Charles", "Mary",
    "Patricia", "Jennifer", "Linda", "Elizabeth", "Barbara", "Susan", "Sarah", "Wei", "Yuki",
    "Aisha", "Pavel", "Ingrid", "Carlos", "Fatima", "Kenji", "Olga", "Raj", "Amara", "Dmitri",
    "Elena", "Hassan", "Priya", "Sven", "Ming", "Akiko", "Omar", "Katya", "Diego", "Nadia",
    "Hiroshi", "Leila", "Jonas", "Greta", "Lukas", "Hannah",
];

static FAMILY_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Chen", "Wang", "Tanaka", "Suzuki", "Kim", "Park", "Patel", "Singh", "Kumar",
    "Ivanov", "Petrov", "Müller", "Schmidt", "Schneider", "Fischer", "Weber", "Dubois",
    "Martin", "Rossi", "Russo", "Silva", "Santos", "Okafor", "Mensah", "Nakamura", "Larsen",
    "Nielsen", "Kowalski", "Novak", "Horvat",
];
