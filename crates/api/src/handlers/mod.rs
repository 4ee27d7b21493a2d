pub mod fichiers;
pub mod home;
pub mod recettes;
