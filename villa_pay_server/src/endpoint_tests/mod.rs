mod helpers;
mod mocks;

mod health;
mod orders;
mod verify;
mod webhook;
