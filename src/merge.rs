use crate::archive::UserExport;
use crate::store::{field, timestamp, Movie, MovieUser, Record, Store, User};

use indexmap::IndexMap;
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub movies_added: usize,
}

pub struct Merge;

impl Merge {
    /// Folds one user's export into the store, stamping it with the current time.
    pub fn merge_user(store: &mut Store, username: &str, export: UserExport) -> MergeStats {
        Self::merge_user_at(store, username, export, &timestamp())
    }

    /// The user's five record lists are replaced wholesale. Movies are only ever added, and a
    /// movie's cross-reference for `username` is written once and never updated.
    pub fn merge_user_at(
        store: &mut Store,
        username: &str,
        export: UserExport,
        now: &str,
    ) -> MergeStats {
        let index = Self::upsert_user(&mut store.users, username, export, now);
        let user = &store.users[index];
        let movies = &mut store.movies;

        let mut stats = MergeStats::default();

        for film in &user.watched {
            let movie = Self::catalog_entry(movies, film, &mut stats);

            if !movie.has_user(username) {
                movie.users.push(MovieUser {
                    name: username.to_owned(),
                    rating: Self::find_rating(&user.ratings, film),
                    watched: true,
                    ..MovieUser::default()
                });
            }
        }

        for film in &user.watchlist {
            Self::catalog_entry(movies, film, &mut stats);
        }

        store.last_updated = Some(now.to_owned());

        stats
    }

    fn upsert_user(users: &mut Vec<User>, username: &str, export: UserExport, now: &str) -> usize {
        let UserExport {
            watched,
            ratings,
            reviews,
            watchlist,
            likes,
        } = export;

        match users.iter().position(|user| user.name == username) {
            Some(index) => {
                let user = &mut users[index];
                user.watched = watched;
                user.ratings = ratings;
                user.reviews = reviews;
                user.watchlist = watchlist;
                user.likes = likes;
                user.enabled = true;
                user.updated_at = Some(now.to_owned());
                index
            }
            None => {
                users.push(User {
                    name: username.to_owned(),
                    watched,
                    ratings,
                    reviews,
                    watchlist,
                    likes,
                    enabled: true,
                    updated_at: Some(now.to_owned()),
                    ..User::default()
                });
                users.len() - 1
            }
        }
    }

    fn catalog_entry<'a>(
        movies: &'a mut IndexMap<String, Movie>,
        film: &Record,
        stats: &mut MergeStats,
    ) -> &'a mut Movie {
        let key = Movie::key(field(film, "Name"), field(film, "Year"));

        movies.entry(key).or_insert_with(|| {
            stats.movies_added += 1;
            Movie::from_record(film)
        })
    }

    fn find_rating(ratings: &[Record], film: &Record) -> Option<Value> {
        ratings
            .iter()
            .find(|rating| {
                field(rating, "Name") == field(film, "Name")
                    && field(rating, "Year") == field(film, "Year")
            })
            .and_then(|rating| rating.get("Rating"))
            .cloned()
    }
}
