pub mod players_sea;
