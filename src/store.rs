use crate::intervals::WinRecord;
use crate::movie::{Movie, NewMovie};

/// In-memory movies table, rebuilt from the CSV at startup. Callers own the
/// locking; the store itself is plain data so it stays trivially testable.
#[derive(Debug)]
pub struct MovieStore {
    movies: Vec<Movie>,
    next_id: u32,
}

impl Default for MovieStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MovieStore {
    pub fn new() -> Self {
        Self {
            movies: Vec::new(),
            next_id: 1,
        }
    }

    pub fn from_rows(rows: Vec<NewMovie>) -> Self {
        let mut store = Self::new();
        for row in rows {
            store.insert(row);
        }
        store
    }

    pub fn insert(&mut self, movie: NewMovie) -> Movie {
        let movie = Movie {
            id: self.next_id,
            year: movie.year,
            title: movie.title,
            studios: movie.studios,
            producers: movie.producers,
            winner: movie.winner,
        };
        self.next_id += 1;
        self.movies.push(movie.clone());
        movie
    }

    pub fn all(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Winning rows ordered by year ascending, the input contract of the
    /// interval calculation.
    pub fn winners(&self) -> Vec<WinRecord> {
        let mut wins: Vec<WinRecord> = self
            .movies
            .iter()
            .filter(|m| m.winner)
            .map(|m| WinRecord {
                producers: m.producers.clone(),
                year: m.year,
            })
            .collect();
        wins.sort_by_key(|w| w.year);
        wins
    }
}
