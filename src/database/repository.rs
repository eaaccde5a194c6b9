pub mod conferences_repository;
pub mod games_repository;
pub mod teams_repository;
